// SPDX-License-Identifier: Apache-2.0

use wardbook_model::{Role, Session};

/// A page's access requirement. `Allowed` carries the non-empty role set
/// that may render the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Allowed(&'static [Role]),
}

pub const DOCTOR_ONLY: RouteAccess = RouteAccess::Allowed(&[Role::Doctor]);
pub const ADMIN_ONLY: RouteAccess = RouteAccess::Allowed(&[Role::Admin]);
pub const ANY_ROLE: RouteAccess = RouteAccess::Allowed(&[Role::Doctor, Role::Admin]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the requested page.
    Render,
    /// Session status still unknown; render a neutral placeholder, never a
    /// redirect.
    Loading,
    /// No session: send the operator to the sign-in page.
    ToSignIn,
    /// Signed in but the wrong role: send the operator to their own landing
    /// page rather than an "unauthorized" wall.
    ToRoleHome(Role),
}

/// Each role's default landing page.
#[must_use]
pub const fn role_home(role: Role) -> &'static str {
    match role {
        Role::Doctor => "/create-patient",
        Role::Admin => "/dashboard",
    }
}

/// The routing decision. Total: every (loading, session, access) combination
/// maps to exactly one outcome, with public pages rendering unconditionally.
#[must_use]
pub fn decide(loading: bool, session: Option<&Session>, access: RouteAccess) -> GuardOutcome {
    let RouteAccess::Allowed(allowed) = access else {
        return GuardOutcome::Render;
    };
    if loading {
        return GuardOutcome::Loading;
    }
    match session {
        None => GuardOutcome::ToSignIn,
        Some(session) if allowed.contains(&session.role) => GuardOutcome::Render,
        Some(session) => GuardOutcome::ToRoleHome(session.role),
    }
}
