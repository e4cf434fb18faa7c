//! In-memory [`Database`] used in tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::Notify;

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{employee, Employee},
    infra::{database, Database},
    read::employee::list,
};

/// In-memory [`Database`] sharing its state between clones.
///
/// [`Transact`]ing returns the same storage, so nothing is ever rolled back.
#[derive(Clone, Debug, Default)]
pub(crate) struct InMemory {
    /// Shared state of this [`InMemory`] database.
    state: Arc<Mutex<State>>,

    /// [`Gate`] holding [`Employee`] lists back, if any.
    gate: Option<Arc<Gate>>,
}

/// Gate holding a selected [`Employee`] list back until released, so that
/// other operations could run in between.
#[derive(Debug, Default)]
pub(crate) struct Gate {
    /// Notified once an [`Employee`] list is selected.
    pub(crate) selected: Notify,

    /// Releases the selected [`Employee`] list.
    pub(crate) release: Notify,
}

/// State of an [`InMemory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Employee`]s.
    employees: HashMap<employee::Id, Employee>,

    /// Number of [`Employee`] lists selected so far.
    listings_selected: usize,
}

impl InMemory {
    /// Creates a new [`InMemory`] database containing the provided
    /// [`Employee`]s.
    pub(crate) fn with(employees: impl IntoIterator<Item = Employee>) -> Self {
        let db = Self::default();
        db.state().employees =
            employees.into_iter().map(|e| (e.id, e)).collect();
        db
    }

    /// Makes this [`InMemory`] database hold every selected [`Employee`]
    /// list back until the returned [`Gate`] releases it.
    pub(crate) fn gated(mut self) -> (Self, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Returns the stored [`Employee`] with the provided ID, if any.
    pub(crate) fn employee(&self, id: employee::Id) -> Option<Employee> {
        self.state().employees.get(&id).cloned()
    }

    /// Returns the number of [`Employee`] lists selected so far.
    pub(crate) fn listings_selected(&self) -> usize {
        self.state().listings_selected
    }

    /// Locks the [`State`] of this [`InMemory`] database.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl Database<Transact> for InMemory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Employee, employee::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Employee>, employee::Id>>> for InMemory {
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.employee(by.into_inner()))
    }
}

impl<'l> Database<Select<By<Option<Employee>, &'l employee::Email>>>
    for InMemory
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, &'l employee::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .state()
            .employees
            .values()
            .find(|e| &e.email == email)
            .cloned())
    }
}

impl Database<Select<By<Vec<Employee>, list::Filter>>> for InMemory {
    type Ok = Vec<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Employee>, list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Filter {
            employment_type,
            contract_type,
            keyword,
        } = by.into_inner();

        let mut state = self.state();
        state.listings_selected += 1;

        let mut employees = state
            .employees
            .values()
            .filter(|e| {
                employment_type.map_or(true, |t| e.employment_type == t)
                    && contract_type.map_or(true, |t| e.contract_type == t)
            })
            .filter(|e| {
                keyword.as_ref().map_or(true, |k| {
                    k.matches(&e.first_name)
                        || k.matches(&e.last_name)
                        || k.matches(&e.email)
                })
            })
            .cloned()
            .collect::<Vec<_>>();
        employees.sort_by_key(|e| {
            (e.last_name.to_string(), e.first_name.to_string(), e.id.to_string())
        });
        drop(state);

        if let Some(gate) = &self.gate {
            gate.selected.notify_one();
            gate.release.notified().await;
        }
        Ok(employees)
    }
}

impl Database<Select<By<list::TotalCount, ()>>> for InMemory {
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let count = self.state().employees.len();
        Ok(i64::try_from(count).unwrap().into())
    }
}

impl Database<Insert<Employee>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().employees.insert(employee.id, employee));
        Ok(())
    }
}

impl Database<Update<Employee>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        if let Some(stored) = self.state().employees.get_mut(&employee.id) {
            *stored = employee;
        }
        Ok(())
    }
}

impl Database<Delete<By<Employee, employee::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().employees.remove(&by.into_inner()));
        Ok(())
    }
}
