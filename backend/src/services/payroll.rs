use serde::Serialize;

use crate::{
    config::PayrollSettings,
    models::{
        employee::HOURS_PER_DAY,
        payroll::{PayrollLine, SalaryInput},
    },
};

use super::aggregation::MonthlyAggregate;

/// Computes one employee's pay for a month. Pure: identical inputs always
/// give an identical line.
pub fn payroll(
    aggregate: &MonthlyAggregate,
    workdays_in_month: u32,
    input: SalaryInput,
    leave_hours_remaining: f64,
    settings: &PayrollSettings,
) -> PayrollLine {
    let standard_hours_in_month = f64::from(workdays_in_month) * HOURS_PER_DAY;
    let basic_work_wage = if standard_hours_in_month > 0.0 {
        aggregate.total_work / standard_hours_in_month * input.basic_salary as f64
    } else {
        0.0
    };

    let wage_before_tax = (basic_work_wage + input.allowance as f64).round() as i64;
    let tax = (basic_work_wage * settings.tax_rate).round() as i64;

    PayrollLine {
        basic_salary: input.basic_salary,
        allowance: input.allowance,
        workdays_in_month,
        standard_hours_in_month,
        total_standard: aggregate.total_standard,
        total_converted_ot: aggregate.total_converted_ot,
        total_leave: aggregate.total_leave,
        total_onsite_in: aggregate.total_onsite_in,
        total_onsite_out: aggregate.total_onsite_out,
        total_work: aggregate.total_work,
        leave_hours_remaining,
        basic_work_wage,
        wage_before_tax,
        tax,
        net_salary: wage_before_tax - tax,
    }
}

/// Converted OT in whole hours, split into the part paid with salary and the
/// part paid as an allowance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OvertimeSplit {
    pub salary_hours: i64,
    pub allowance_hours: i64,
}

impl OvertimeSplit {
    pub fn from_converted(total_converted_ot: f64, settings: &PayrollSettings) -> Self {
        let total = total_converted_ot.round() as i64;
        let cap = settings.ot_salary_cap_hours.max(0);
        Self {
            salary_hours: total.min(cap),
            allowance_hours: (total - cap).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(total_standard: f64, total_converted_ot: f64) -> MonthlyAggregate {
        MonthlyAggregate {
            total_standard,
            total_converted_ot,
            total_work: total_standard + total_converted_ot,
            ..MonthlyAggregate::default()
        }
    }

    #[test]
    fn full_attendance_earns_the_basic_salary() {
        let line = payroll(
            &aggregate(160.0, 0.0),
            20,
            SalaryInput {
                basic_salary: 10_000_000,
                allowance: 0,
            },
            0.0,
            &PayrollSettings::default(),
        );
        assert_eq!(line.standard_hours_in_month, 160.0);
        assert_eq!(line.wage_before_tax, 10_000_000);
        assert_eq!(line.tax, 1_000_000);
        assert_eq!(line.net_salary, 9_000_000);
    }

    #[test]
    fn allowance_is_not_taxed() {
        let line = payroll(
            &aggregate(160.0, 0.0),
            20,
            SalaryInput {
                basic_salary: 10_000_000,
                allowance: 500_000,
            },
            0.0,
            &PayrollSettings::default(),
        );
        assert_eq!(line.wage_before_tax, 10_500_000);
        assert_eq!(line.tax, 1_000_000);
        assert_eq!(line.net_salary, 9_500_000);
    }

    #[test]
    fn zero_workdays_gives_zero_wage() {
        let line = payroll(
            &aggregate(40.0, 4.0),
            0,
            SalaryInput {
                basic_salary: 10_000_000,
                allowance: 200_000,
            },
            0.0,
            &PayrollSettings::default(),
        );
        assert_eq!(line.basic_work_wage, 0.0);
        assert_eq!(line.wage_before_tax, 200_000);
        assert_eq!(line.tax, 0);
    }

    #[test]
    fn payroll_is_idempotent() {
        let settings = PayrollSettings::default();
        let totals = aggregate(150.0, 12.5);
        let input = SalaryInput {
            basic_salary: 8_765_432,
            allowance: 123_456,
        };
        assert_eq!(
            payroll(&totals, 23, input, 12.0, &settings),
            payroll(&totals, 23, input, 12.0, &settings)
        );
    }

    #[test]
    fn overtime_above_cap_moves_to_allowance() {
        let settings = PayrollSettings::default();
        assert_eq!(
            OvertimeSplit::from_converted(45.4, &settings),
            OvertimeSplit {
                salary_hours: 39,
                allowance_hours: 6
            }
        );
        assert_eq!(
            OvertimeSplit::from_converted(12.5, &settings),
            OvertimeSplit {
                salary_hours: 13,
                allowance_hours: 0
            }
        );
    }
}
