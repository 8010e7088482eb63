use std::fmt;

/// Navigable locations. Paths follow the web routes of the directory:
/// `/`, `/about`, `/employees-new` (and the legacy `/employees`), `/report`
/// and `/report/:filter`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    About,
    Employees,
    Report(Option<String>),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["about"] => Route::About,
            ["employees-new"] | ["employees"] => Route::Employees,
            ["report"] => Route::Report(None),
            ["report", filter] => Route::Report(Some((*filter).to_string())),
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Employees => "/employees-new".to_string(),
            Route::Report(None) => "/report".to_string(),
            Route::Report(Some(filter)) => format!("/report/{filter}"),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Label for the navigation bar.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::About => "About",
            Route::Employees => "Employees",
            Route::Report(_) => "Report",
            Route::NotFound(_) => "Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("/about"), Route::About);
        assert_eq!(Route::parse("/employees-new"), Route::Employees);
        assert_eq!(Route::parse("/employees/"), Route::Employees);
        assert_eq!(Route::parse("/report"), Route::Report(None));
        assert_eq!(
            Route::parse("/report/deleted_today"),
            Route::Report(Some("deleted_today".into()))
        );
    }

    #[test]
    fn test_unmatched_paths() {
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".into()));
        assert_eq!(
            Route::parse("/report/a/b"),
            Route::NotFound("/report/a/b".into())
        );
    }

    #[test]
    fn test_path_round_trip() {
        for path in ["/", "/about", "/employees-new", "/report", "/report/login_today"] {
            assert_eq!(Route::parse(path).path(), path);
        }
        assert_eq!(Route::parse("/employees").path(), "/employees-new");
    }
}
