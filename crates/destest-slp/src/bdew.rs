use chrono::{Datelike, NaiveDate, Weekday};
use destest_core::{hourly_index, hours_in_year, DestestError, DestestResult, HolidaySet};
use tracing::trace;

use crate::archetype::{hour_factors, TemperatureClass};
use crate::{ProfileSynthesizer, SynthesisRequest};

/// SigLinDe-style heat profile.
///
/// Each hour gets the weight `h(T_day) × F(weekday) × f(hour)`; the curve is
/// those weights scaled so they add up to the requested annual total.
#[derive(Debug, Clone, Copy)]
pub struct BdewHeatProfile {
    /// Smooth the daily mean over the three previous days
    /// (`(T0 + T-1/2 + T-2/4 + T-3/8) / 1.875`).
    pub geometric_temperature: bool,
}

impl Default for BdewHeatProfile {
    fn default() -> Self {
        Self {
            geometric_temperature: true,
        }
    }
}

impl ProfileSynthesizer for BdewHeatProfile {
    fn name(&self) -> &str {
        "bdew-heat"
    }

    fn synthesize(&self, request: &SynthesisRequest<'_>) -> DestestResult<Vec<f64>> {
        let fail = |reason: String| DestestError::synthesis(request.apartment, reason);

        let annual = request.annual_demand.value();
        if !annual.is_finite() || annual < 0.0 {
            return Err(fail(format!(
                "annual total must be finite and >= 0, got {annual}"
            )));
        }
        request.archetype.validate().map_err(|e| fail(e.to_string()))?;
        let hours = hours_in_year(request.year)?;
        if request.temperature.len() != hours {
            return Err(fail(format!(
                "temperature series has {} values, year {} has {hours} hours",
                request.temperature.len(),
                request.year
            )));
        }
        if let Some(pos) = request.temperature.iter().position(|t| !t.is_finite()) {
            return Err(fail(format!("temperature at hour {pos} is not finite")));
        }

        let daily = self.daily_temperatures(request.temperature);
        let sigmoid = request.archetype.sigmoid();
        let weekday_factors = request.archetype.weekday_factors();

        let timestamps = hourly_index(request.year)?;
        let mut weights = Vec::with_capacity(hours);
        for day in timestamps.chunks(24) {
            let date = day[0].date();
            let t_day = daily[date.ordinal0() as usize];
            let sunday_like = is_sunday_like(date, request.holidays);
            if let Some(holiday) = request.holidays.label(date) {
                trace!(%date, holiday, "holiday follows the Sunday profile");
            }
            let weekday = if sunday_like {
                6
            } else {
                date.weekday().num_days_from_monday() as usize
            };
            let day_weight = sigmoid.daily_factor(t_day) * weekday_factors[weekday];
            let hourly = hour_factors(
                &request.archetype,
                TemperatureClass::of(t_day),
                sunday_like,
            );
            weights.extend(hourly.iter().map(|f| day_weight * f / 24.0));
        }

        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(fail(format!("profile weights sum to {total}")));
        }
        let scale = annual / total;
        trace!(apartment = %request.apartment, scale, "scaled profile");
        Ok(weights.into_iter().map(|w| w * scale).collect())
    }
}

impl BdewHeatProfile {
    /// Daily mean temperatures, geometric-weighted when enabled. Days before
    /// January 1 wrap around to the end of the same year.
    fn daily_temperatures(&self, hourly: &[f64]) -> Vec<f64> {
        let means: Vec<f64> = hourly
            .chunks(24)
            .map(|day| day.iter().sum::<f64>() / day.len() as f64)
            .collect();
        if !self.geometric_temperature {
            return means;
        }
        let n = means.len();
        (0..n)
            .map(|d| {
                let back = |k: usize| means[(d + n - k) % n];
                (back(0) + 0.5 * back(1) + 0.25 * back(2) + 0.125 * back(3)) / 1.875
            })
            .collect()
    }
}

fn is_sunday_like(date: NaiveDate, holidays: &HolidaySet) -> bool {
    date.weekday() == Weekday::Sun || holidays.contains(date)
}
