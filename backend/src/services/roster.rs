//! Which employees appear on the timekeeping grid, and in what order.

use std::cmp::Ordering;

use crate::{config::RosterSettings, models::employee::Employee};

/// Drops hidden codes and departments, then orders by the configured name
/// list. Unlisted employees follow the listed ones, by code.
pub fn arrange(employees: Vec<Employee>, settings: &RosterSettings) -> Vec<Employee> {
    let mut visible: Vec<Employee> = employees
        .into_iter()
        .filter(|emp| is_visible(emp, settings))
        .collect();
    visible.sort_by(|a, b| compare(a, b, settings));
    visible
}

pub fn is_visible(employee: &Employee, settings: &RosterSettings) -> bool {
    let hidden_code = settings.hidden_codes.iter().any(|c| *c == employee.code);
    let hidden_department = employee
        .department
        .as_deref()
        .is_some_and(|dept| settings.hidden_departments.iter().any(|d| d == dept));
    !hidden_code && !hidden_department
}

fn compare(a: &Employee, b: &Employee, settings: &RosterSettings) -> Ordering {
    let rank = |emp: &Employee| {
        settings
            .display_order
            .iter()
            .position(|name| *name == emp.full_name)
    };
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.code.cmp(&b.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmployeeId;

    fn emp(code: &str, name: &str, dept: Option<&str>) -> Employee {
        Employee {
            id: EmployeeId::new(),
            code: code.into(),
            full_name: name.into(),
            email: None,
            department: dept.map(str::to_string),
            leave_quota: None,
        }
    }

    fn settings() -> RosterSettings {
        RosterSettings {
            hidden_codes: vec!["NV018".into()],
            hidden_departments: vec!["Ban Giám đốc".into()],
            display_order: vec!["Vũ Thanh Bình".into(), "Phan Thanh Toàn".into()],
        }
    }

    #[test]
    fn hidden_codes_and_departments_are_removed() {
        let result = arrange(
            vec![
                emp("NV018", "Hidden Code", None),
                emp("NV020", "Director", Some("Ban Giám đốc")),
                emp("NV003", "Kept", Some("Kỹ thuật")),
            ],
            &settings(),
        );
        let codes: Vec<_> = result.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["NV003"]);
    }

    #[test]
    fn listed_names_come_first_then_codes() {
        let result = arrange(
            vec![
                emp("NV009", "Unlisted B", None),
                emp("NV001", "Phan Thanh Toàn", None),
                emp("NV004", "Unlisted A", None),
                emp("NV007", "Vũ Thanh Bình", None),
            ],
            &settings(),
        );
        let codes: Vec<_> = result.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["NV007", "NV001", "NV004", "NV009"]);
    }
}
