//! Permission Model

use serde::{Deserialize, Serialize};

use crate::Lang;

/// Permission entity: one `module`/`action` pair with localized text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub id: i64,
    pub module: String,
    pub action: String,
    pub display_name_ar: Option<String>,
    pub display_name_en: Option<String>,
}

impl Permission {
    /// Localized name, falling back to `module.action`
    pub fn label(&self, lang: Lang) -> String {
        let localized = match lang {
            Lang::Ar => self.display_name_ar.as_deref(),
            Lang::En => self.display_name_en.as_deref(),
        };
        match localized.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("{}.{}", self.module, self.action),
        }
    }
}

/// Permissions of one module, in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionGroup<'a> {
    pub module: &'a str,
    pub permissions: Vec<&'a Permission>,
}

/// Group permissions by module, keeping the order the server sent them in
pub fn group_by_module(permissions: &[Permission]) -> Vec<PermissionGroup<'_>> {
    let mut groups: Vec<PermissionGroup<'_>> = Vec::new();
    for permission in permissions {
        match groups.iter_mut().find(|g| g.module == permission.module) {
            Some(group) => group.permissions.push(permission),
            None => groups.push(PermissionGroup {
                module: &permission.module,
                permissions: vec![permission],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(id: i64, module: &str, action: &str) -> Permission {
        Permission {
            id,
            module: module.into(),
            action: action.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_keeps_first_seen_order() {
        let perms = vec![
            perm(1, "payroll", "view"),
            perm(2, "employees", "view"),
            perm(3, "payroll", "approve"),
        ];
        let groups = group_by_module(&perms);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].module, "payroll");
        assert_eq!(
            groups[0].permissions.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(groups[1].module, "employees");
    }

    #[test]
    fn test_label_fallback() {
        let mut p = perm(1, "payroll", "view");
        assert_eq!(p.label(Lang::En), "payroll.view");
        p.display_name_en = Some("View payroll".into());
        assert_eq!(p.label(Lang::En), "View payroll");
    }
}
