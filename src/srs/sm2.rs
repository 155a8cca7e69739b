use crate::config::MIN_EASE_FACTOR;
use crate::domain::Quality;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sm2Result {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
}

pub fn calculate_sm2(
  current_repetitions: i64,
  current_interval: i64,
  current_ease_factor: f64,
  quality: Quality,
) -> Sm2Result {
  let q = quality.value() as f64;

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  // Applied on lapses too; only the interval and repetitions reset.
  let delta = 5.0 - q;
  let ease_delta = 0.1 - delta * (0.08 + delta * 0.02);
  let new_ease_factor = (current_ease_factor + ease_delta).max(MIN_EASE_FACTOR);

  let (new_interval, new_repetitions) = if quality.is_lapse() {
    (1, 0)
  } else {
    let repetitions = current_repetitions + 1;
    let interval = match repetitions {
      1 => 1,
      2 => 6,
      _ => ((current_interval as f64) * current_ease_factor).round() as i64,
    };
    (interval, repetitions)
  };

  Sm2Result {
    ease_factor: new_ease_factor,
    interval_days: new_interval,
    repetitions: new_repetitions,
  }
}
