//! Sign-out on a rejected admin token
//!
//! [`AdminApi`](crate::services::AdminApi) calls can be made from any panel,
//! long after the view that mounted the session guard rendered. When the
//! backend answers one of them with 401 the stored token is no longer good,
//! so the request side reports it here and [`SessionProvider`] runs the
//! guard's logout and follows the redirect to the login view.
//!
//! [`SessionProvider`]: crate::auth::SessionProvider

use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static ON_UNAUTHORIZED: RefCell<Option<Rc<dyn Fn()>>> = RefCell::new(None);
}

/// Install the sign-out action; replaces any earlier one
pub fn set_unauthorized_handler(handler: Rc<dyn Fn()>) {
    ON_UNAUTHORIZED.with(|slot| *slot.borrow_mut() = Some(handler));
}

pub fn clear_unauthorized_handler() {
    ON_UNAUTHORIZED.with(|slot| *slot.borrow_mut() = None);
}

/// Report a 401 from the admin API; returns whether a handler ran
pub fn notify_unauthorized() -> bool {
    // Cloned out so the handler may replace itself
    let handler = ON_UNAUTHORIZED.with(|slot| slot.borrow().clone());
    match handler {
        Some(handler) => {
            handler();
            true
        }
        None => {
            tracing::warn!("Admin token rejected with no session provider mounted");
            false
        }
    }
}
