//! Seed rows for `--demo`, placed relative to the current time so every
//! dashboard card and report has something to show.

use chrono::{DateTime, TimeDelta, Utc};
use staffdesk_store::{Employee, LoginStatus, MemoryStore};

const PEOPLE: &[(&str, &str, &str)] = &[
    ("Asha Rao", "Engineering", "Backend Developer"),
    ("Ben Okafor", "Engineering", "QA Engineer"),
    ("Chen Wei", "Finance", "Accountant"),
    ("Dora Silva", "Human Resources", "HR Generalist"),
    ("Eli Novak", "Engineering", "Team Lead"),
    ("Fay Moreau", "Sales", "Account Executive"),
    ("Gus Lindqvist", "Operations", "Office Manager"),
    ("Hana Sato", "Design", "Product Designer"),
    ("Ivo Petrov", "Sales", "Sales Manager"),
    ("Jun Park", "Engineering", "Frontend Developer"),
    ("Kira Mensah", "Support", "Support Specialist"),
    ("Leo Brandt", "Finance", "Controller"),
];

pub fn store(now: DateTime<Utc>) -> MemoryStore {
    MemoryStore::with_rows(rows(now))
}

pub fn rows(now: DateTime<Utc>) -> Vec<Employee> {
    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, (name, department, role))| {
            let id = i as i64 + 1;
            let email = format!(
                "{}@staffdesk.test",
                name.to_lowercase().replace(' ', ".")
            );
            let mut employee = Employee {
                id,
                emp_code: Some(format!("EMP{:04}", id)),
                name: name.to_string(),
                email,
                department: Some(department.to_string()),
                role: Some(role.to_string()),
                status: Some("active".to_string()),
                login_status: Some(LoginStatus::LoggedOut),
                created_at: now - TimeDelta::days(30 - id),
                last_login: None,
                last_logout: None,
                deleted_at: None,
                deleted_by: None,
            };

            match id {
                1 | 2 => employee.created_at = now - TimeDelta::minutes(20 * id),
                3 => employee.created_at = now - TimeDelta::hours(26),
                4 => {
                    employee.deleted_at = Some(now - TimeDelta::minutes(5));
                    employee.deleted_by = Some("hr-admin".to_string());
                }
                5 => {
                    employee.deleted_at = Some(now - TimeDelta::hours(27));
                    employee.deleted_by = Some("Unknown".to_string());
                }
                6 | 7 => {
                    employee.login_status = Some(LoginStatus::LoggedIn);
                    employee.last_login = Some(now - TimeDelta::minutes(15 * id));
                }
                8 => {
                    employee.last_login = Some(now - TimeDelta::hours(28));
                    employee.last_logout = Some(now - TimeDelta::hours(25));
                }
                9 => {
                    employee.last_login = Some(now - TimeDelta::hours(3));
                    employee.last_logout = Some(now - TimeDelta::minutes(30));
                }
                _ => {}
            }
            employee
        })
        .collect()
}
