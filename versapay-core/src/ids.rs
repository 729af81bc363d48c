//! Timestamp identifiers: `org_<ms>`, `emp_<ms>`, `pay_<ms>`.

use chrono::Utc;

pub const ORGANIZATION_PREFIX: &str = "org";
pub const EMPLOYEE_PREFIX: &str = "emp";
pub const PAYROLL_RUN_PREFIX: &str = "pay";

/// Hands out millisecond-stamped ids that never repeat within one generator.
///
/// If the clock has not moved past the last issued millisecond, the next
/// millisecond is used instead. Callers pass `taken` to skip ids that already
/// exist in stored data.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_ms: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        self.next_from(Utc::now().timestamp_millis(), prefix, taken)
    }

    fn next_from(&mut self, now_ms: i64, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        let mut ms = now_ms.max(self.last_ms + 1);
        let mut id = format!("{prefix}_{ms}");
        while taken(&id) {
            ms += 1;
            id = format!("{prefix}_{ms}");
        }
        self.last_ms = ms;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_clock_when_it_advances() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_from(1_000, "pay", |_| false), "pay_1000");
        assert_eq!(ids.next_from(2_000, "pay", |_| false), "pay_2000");
    }

    #[test]
    fn same_millisecond_bumps_forward() {
        let mut ids = IdGenerator::new();
        let a = ids.next_from(5_000, "emp", |_| false);
        let b = ids.next_from(5_000, "emp", |_| false);
        assert_eq!(a, "emp_5000");
        assert_eq!(b, "emp_5001");
    }

    #[test]
    fn skips_ids_already_taken() {
        let mut ids = IdGenerator::new();
        let id = ids.next_from(7_000, "org", |candidate| {
            candidate == "org_7000" || candidate == "org_7001"
        });
        assert_eq!(id, "org_7002");
    }

    #[test]
    fn real_clock_ids_carry_prefix() {
        let mut ids = IdGenerator::new();
        let id = ids.next(PAYROLL_RUN_PREFIX, |_| false);
        assert!(id.starts_with("pay_"));
        assert!(id["pay_".len()..].parse::<i64>().is_ok());
    }
}
