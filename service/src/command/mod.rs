//! [`Command`] definition.

pub mod create_employee;
pub mod delete_employee;
pub mod update_employee;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_employee::CreateEmployee, delete_employee::DeleteEmployee,
    update_employee::UpdateEmployee,
};
