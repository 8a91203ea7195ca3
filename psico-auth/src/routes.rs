//! Client route table.
//!
//! Patterns are `/`-separated; a `:name` segment matches exactly one
//! non-empty segment and is captured. Matching ignores a trailing slash.

use std::collections::BTreeMap;

use psico_core::Role;

/// Section of the client a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    Public,
    Patient,
    Triage,
    Professional,
    GlobalAdmin,
    ClinicAdmin,
}

impl Area {
    /// Role the area requires; `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Area::Public => None,
            Area::Patient | Area::Triage => Some(Role::Patient),
            Area::Professional => Some(Role::Professional),
            Area::GlobalAdmin | Area::ClinicAdmin => Some(Role::Admin),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: String,
    pub area: Area,
}

impl RouteEntry {
    pub fn new(pattern: impl Into<String>, area: Area) -> Self {
        Self {
            pattern: pattern.into(),
            area,
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        self.area.required_role()
    }

    /// Captured params when `path` matches this pattern.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let want = segments(&self.pattern);
        let got = segments(path);
        if want.len() != got.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (w, g) in want.iter().zip(got.iter()) {
            match w.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), g.to_string());
                }
                None if w == g => {}
                None => return None,
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        use Area::*;
        let table: &[(&str, Area)] = &[
            ("/", Public),
            ("/home", Public),
            ("/register", Public),
            ("/login", Public),
            ("/reset-password", Public),
            ("/reset-password/:uid/:token", Public),
            ("/payment-success", Public),
            ("/payment-cancel", Public),
            ("/dashboard", Patient),
            ("/my-appointments", Patient),
            ("/my-journal", Patient),
            ("/my-objectives", Patient),
            ("/my-documents", Patient),
            ("/profile", Patient),
            ("/professional/:id", Patient),
            ("/chat/:appointmentId", Patient),
            ("/triage", Triage),
            ("/psychologist-dashboard", Professional),
            ("/psychologist-availability", Professional),
            ("/psychologist/chat/:appointmentId", Professional),
            ("/psychologist-profile", Professional),
            ("/psychologist-documents", Professional),
            ("/psychologist-plans", Professional),
            ("/appointment/:appointmentId/note", Professional),
            ("/clinical-history/patient/:patientId", Professional),
            ("/global-admin", GlobalAdmin),
            ("/global-admin/clinics", GlobalAdmin),
            ("/global-admin/users", GlobalAdmin),
            ("/global-admin/stats", GlobalAdmin),
            ("/admin-dashboard", ClinicAdmin),
            ("/admin/user/:userId", ClinicAdmin),
            ("/admin/professional-profile/:userId", ClinicAdmin),
            ("/admin-dashboard/validate", ClinicAdmin),
            ("/admin-dashboard/backups", ClinicAdmin),
            ("/admin-dashboard/audit-log", ClinicAdmin),
            ("/admin-dashboard/reports", ClinicAdmin),
        ];
        Self::new(table.iter().map(|(p, a)| RouteEntry::new(*p, *a)))
    }
}

impl RouteTable {
    pub fn new<I: IntoIterator<Item = RouteEntry>>(entries: I) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// First entry matching `path`. Literal patterns are listed before
    /// parameterised siblings, so declaration order decides.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            entry
                .matches(path)
                .map(|params| RouteMatch { entry, params })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_captured() {
        let table = RouteTable::default();
        let m = table.lookup("/reset-password/MQ/abc-123").unwrap();
        assert_eq!(m.entry.area, Area::Public);
        assert_eq!(m.params["uid"], "MQ");
        assert_eq!(m.params["token"], "abc-123");

        let m = table.lookup("/appointment/42/note/").unwrap();
        assert_eq!(m.entry.area, Area::Professional);
        assert_eq!(m.params["appointmentId"], "42");
    }

    #[test]
    fn areas_carry_roles() {
        let table = RouteTable::default();
        assert_eq!(table.lookup("/admin-dashboard/backups").unwrap().entry.required_role(), Some(Role::Admin));
        assert_eq!(table.lookup("/triage").unwrap().entry.required_role(), Some(Role::Patient));
        assert_eq!(table.lookup("/login?next=/dashboard").unwrap().entry.required_role(), None);
    }

    #[test]
    fn unknown_paths_do_not_match() {
        let table = RouteTable::default();
        assert!(table.lookup("/nope").is_none());
        assert!(table.lookup("/professional").is_none());
        assert!(table.lookup("/professional/1/extra").is_none());
    }

    #[test]
    fn root_matches_only_root() {
        let table = RouteTable::default();
        assert_eq!(table.lookup("/").unwrap().entry.pattern, "/");
        assert_eq!(table.lookup("").unwrap().entry.pattern, "/");
    }
}
