//! Compiled role permission table.
//!
//! Capabilities are a deploy-time constant: [`grant`] is an exhaustive match
//! over every role and resource category, so a missing combination does not
//! compile. Anything not listed in a grant is denied.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Role;

/// Resource categories guarded by the permission table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Users,
    Students,
    Classes,
    Assignments,
    Analytics,
    Catalog,
}

impl ResourceCategory {
    pub fn all() -> [ResourceCategory; 6] {
        [
            ResourceCategory::Users,
            ResourceCategory::Students,
            ResourceCategory::Classes,
            ResourceCategory::Assignments,
            ResourceCategory::Analytics,
            ResourceCategory::Catalog,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCategory::Users => "users",
            ResourceCategory::Students => "students",
            ResourceCategory::Classes => "classes",
            ResourceCategory::Assignments => "assignments",
            ResourceCategory::Analytics => "analytics",
            ResourceCategory::Catalog => "catalog",
        }
    }
}

/// Actions that can be performed on a resource category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Validate,
    Export,
}

impl Action {
    pub fn all() -> [Action; 6] {
        [
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::Validate,
            Action::Export,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Validate => "validate",
            Action::Export => "export",
        }
    }
}

/// A category/action pair, rendered as `category:action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionKey {
    pub category: ResourceCategory,
    pub action: Action,
}

impl PermissionKey {
    pub fn new(category: ResourceCategory, action: Action) -> Self {
        Self { category, action }
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.as_str(), self.action.as_str())
    }
}

impl Serialize for PermissionKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Actions a role holds on one category.
///
/// `owner_scoped` lists the allowed actions that additionally require the
/// actor to own the target resource unless the role is elevated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub allowed: &'static [Action],
    pub owner_scoped: &'static [Action],
}

impl Grant {
    pub const DENY: Grant = Grant::of(NONE);

    const fn of(allowed: &'static [Action]) -> Grant {
        Grant {
            allowed,
            owner_scoped: NONE,
        }
    }

    const fn owned(allowed: &'static [Action], owner_scoped: &'static [Action]) -> Grant {
        Grant {
            allowed,
            owner_scoped,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.allowed.contains(&action)
    }

    pub fn is_owner_scoped(&self, action: Action) -> bool {
        self.owner_scoped.contains(&action)
    }
}

const NONE: &[Action] = &[];
const READ: &[Action] = &[Action::Read];
const EXPORT: &[Action] = &[Action::Export];
const READ_EXPORT: &[Action] = &[Action::Read, Action::Export];
const ALL: &[Action] = &[
    Action::Read,
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::Validate,
    Action::Export,
];

/// Role capabilities, one explicit entry per role and category.
pub fn grant(role: Role, category: ResourceCategory) -> Grant {
    use Action::*;
    use ResourceCategory::*;

    match (role, category) {
        (Role::Admin, Users) => Grant::of(ALL),
        (Role::Admin, Students) => Grant::of(ALL),
        (Role::Admin, Classes) => Grant::of(ALL),
        (Role::Admin, Assignments) => Grant::of(ALL),
        (Role::Admin, Analytics) => Grant::of(ALL),
        (Role::Admin, Catalog) => Grant::of(ALL),

        (Role::Direction, Users) => Grant::of(&[Read, Create, Update, Export]),
        (Role::Direction, Students) => Grant::of(ALL),
        (Role::Direction, Classes) => Grant::of(ALL),
        (Role::Direction, Assignments) => Grant::of(ALL),
        (Role::Direction, Analytics) => Grant::of(READ_EXPORT),
        (Role::Direction, Catalog) => Grant::of(&[Read, Create, Update, Validate, Export]),

        (Role::Teacher, Users) => Grant::DENY,
        (Role::Teacher, Students) => Grant::of(READ),
        (Role::Teacher, Classes) => Grant::of(READ),
        (Role::Teacher, Assignments) => {
            Grant::owned(&[Read, Create, Update, Delete, Export], &[Update, Delete])
        }
        (Role::Teacher, Analytics) => Grant::of(READ),
        (Role::Teacher, Catalog) => Grant::of(&[Read, Create]),

        (Role::Intervenant, Users) => Grant::DENY,
        (Role::Intervenant, Students) => Grant::of(READ),
        (Role::Intervenant, Classes) => Grant::of(READ),
        (Role::Intervenant, Assignments) => Grant::of(READ),
        (Role::Intervenant, Analytics) => Grant::DENY,
        (Role::Intervenant, Catalog) => Grant::of(READ),

        (Role::Inspector, Users) => Grant::DENY,
        (Role::Inspector, Students) => Grant::of(READ_EXPORT),
        (Role::Inspector, Classes) => Grant::of(READ_EXPORT),
        (Role::Inspector, Assignments) => Grant::of(READ_EXPORT),
        (Role::Inspector, Analytics) => Grant::of(EXPORT),
        (Role::Inspector, Catalog) => Grant::of(READ),

        (Role::StudentProxy, Users) => Grant::DENY,
        (Role::StudentProxy, Students) => Grant::of(READ),
        (Role::StudentProxy, Classes) => Grant::DENY,
        (Role::StudentProxy, Assignments) => Grant::of(READ),
        (Role::StudentProxy, Analytics) => Grant::DENY,
        (Role::StudentProxy, Catalog) => Grant::of(READ),
    }
}

pub fn is_allowed(role: Role, category: ResourceCategory, action: Action) -> bool {
    grant(role, category).allows(action)
}

pub fn is_allowed_any(role: Role, category: ResourceCategory, actions: &[Action]) -> bool {
    let grant = grant(role, category);
    actions.iter().any(|action| grant.allows(*action))
}

/// Roles that bypass ownership scoping.
pub const ELEVATED_ROLES: &[Role] = &[Role::Admin, Role::Direction];

/// How ownership-scoped grants are checked for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Only the permission table applies.
    Bypass,
    /// Owner-scoped actions also need `actor == owner`.
    RequireOwner,
}

pub fn ownership_policy(role: Role) -> OwnershipPolicy {
    if ELEVATED_ROLES.contains(&role) {
        OwnershipPolicy::Bypass
    } else {
        OwnershipPolicy::RequireOwner
    }
}

/// Every `(role, category, action)` triple the table allows.
pub fn allowed_triples() -> Vec<(Role, ResourceCategory, Action)> {
    let mut triples = Vec::new();
    for role in Role::all() {
        for category in ResourceCategory::all() {
            for action in grant(role, category).allowed {
                triples.push((role, category, *action));
            }
        }
    }
    triples
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionTableError {
    #[error("{role} has owner-scoped {category}:{action} without the base grant")]
    OwnerScopeWithoutGrant {
        role: Role,
        category: &'static str,
        action: &'static str,
    },

    #[error("{role} lists {category}:{action} more than once")]
    DuplicateAction {
        role: Role,
        category: &'static str,
        action: &'static str,
    },
}

/// Startup consistency check of the compiled table.
pub fn verify() -> Result<(), PermissionTableError> {
    for role in Role::all() {
        for category in ResourceCategory::all() {
            let grant = grant(role, category);
            for (index, action) in grant.allowed.iter().enumerate() {
                if grant.allowed[..index].contains(action) {
                    return Err(PermissionTableError::DuplicateAction {
                        role,
                        category: category.as_str(),
                        action: action.as_str(),
                    });
                }
            }
            if let Some(action) = grant.owner_scoped.iter().find(|a| !grant.allows(**a)) {
                return Err(PermissionTableError::OwnerScopeWithoutGrant {
                    role,
                    category: category.as_str(),
                    action: action.as_str(),
                });
            }
        }
    }
    Ok(())
}
