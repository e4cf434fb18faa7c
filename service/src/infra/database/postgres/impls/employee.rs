//! [`Employee`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    money::Currency,
    operations::{By, Delete, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{employee, Employee},
    infra::{
        database::{
            self,
            postgres::{Connection, SearchPattern},
            Postgres,
        },
        Database,
    },
    read::employee::list,
};

/// Columns of the `employees` table, in the order they're selected.
const COLUMNS: &str = "\
    id, first_name, middle_name, last_name, \
    email, mobile_number, residential_address, \
    contract_type, employment_type, \
    start_date, finish_date, ongoing, \
    salary_amount, salary_currency, hours_per_week, \
    created_at";

/// Reads an [`Employee`] from the provided [`Row`] containing [`COLUMNS`].
fn employee_from(row: &Row) -> Employee {
    let amount = Money::new(
        row.get::<_, Decimal>("salary_amount"),
        row.get::<_, Currency>("salary_currency"),
    );
    // SAFETY: `employees_salary_positive` constraint keeps the stored amount
    //         positive.
    #[expect(unsafe_code, reason = "invariants are preserved")]
    let salary = unsafe { employee::Salary::new_unchecked(amount) };

    Employee {
        id: row.get("id"),
        first_name: row.get("first_name"),
        middle_name: row.get("middle_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        mobile_number: row.get("mobile_number"),
        residential_address: row.get("residential_address"),
        contract_type: row.get("contract_type"),
        employment_type: row.get("employment_type"),
        start_date: row.get("start_date"),
        finish_date: row.get("finish_date"),
        ongoing: row.get("ongoing"),
        salary,
        hours_per_week: row.get("hours_per_week"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<employee::Id, Employee>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[employee::Id]>,
{
    type Ok = HashMap<employee::Id, Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<employee::Id, Employee>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[employee::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM employees \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(employee_from)
            .map(|e| (e.id, e))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Employee>, employee::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<employee::Id, Employee>, [employee::Id; 1]>>,
        Ok = HashMap<employee::Id, Employee>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<Employee>, &'l employee::Email>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, &'l employee::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM employees \
             WHERE email = $1::VARCHAR \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[email])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(employee_from))
    }
}

impl<C> Database<Select<By<Vec<Employee>, list::Filter>>> for Postgres<C>
where
    C: Connection,
{
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
        let pattern = keyword.as_ref().map(SearchPattern::new);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let mut conditions = vec![];
        if let Some(t) = &employment_type {
            ps.push(t);
            conditions.push(format!("employment_type = ${}::INT2", ps.len()));
        }
        if let Some(t) = &contract_type {
            ps.push(t);
            conditions.push(format!("contract_type = ${}::INT2", ps.len()));
        }
        if let Some(p) = &pattern {
            ps.push(p);
            let idx = ps.len();
            conditions.push(format!(
                "(LOWER(first_name) LIKE ${idx}::VARCHAR \
                  OR LOWER(last_name) LIKE ${idx}::VARCHAR \
                  OR LOWER(email) LIKE ${idx}::VARCHAR)",
            ));
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM employees \
             {filtering} \
             ORDER BY last_name, first_name, id",
            filtering = if conditions.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", conditions.iter().format(" AND "))
            },
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(employee_from)
            .collect())
    }
}

impl<C> Database<Select<By<list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT8 \
            FROM employees";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i64>(0).into())
    }
}

impl<C> Database<Insert<Employee>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let Employee {
            id,
            first_name,
            middle_name,
            last_name,
            email,
            mobile_number,
            residential_address,
            contract_type,
            employment_type,
            start_date,
            finish_date,
            ongoing,
            salary,
            hours_per_week,
            created_at,
        } = employee;
        let Money {
            amount: salary_amount,
            currency: salary_currency,
        } = salary.amount();

        const SQL: &str = "\
            INSERT INTO employees (\
                id, first_name, middle_name, last_name, \
                email, mobile_number, residential_address, \
                contract_type, employment_type, \
                start_date, finish_date, ongoing, \
                salary_amount, salary_currency, hours_per_week, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::INT2, $9::INT2, \
                $10::DATE, $11::DATE, $12::BOOLEAN, \
                $13::NUMERIC, $14::INT2, $15::INT2, \
                $16::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &first_name,
                &middle_name,
                &last_name,
                &email,
                &mobile_number,
                &residential_address,
                &contract_type,
                &employment_type,
                &start_date,
                &finish_date,
                &ongoing,
                &salary_amount,
                &salary_currency,
                &hours_per_week,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

/// Updates the stored [`Employee`] in place.
///
/// Does nothing if the [`Employee`] doesn't exist (has been deleted, for
/// example), so never recreates it.
impl<C> Database<Update<Employee>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let Employee {
            id,
            first_name,
            middle_name,
            last_name,
            email,
            mobile_number,
            residential_address,
            contract_type,
            employment_type,
            start_date,
            finish_date,
            ongoing,
            salary,
            hours_per_week,
            created_at: _,
        } = employee;
        let Money {
            amount: salary_amount,
            currency: salary_currency,
        } = salary.amount();

        const SQL: &str = "\
            UPDATE employees \
            SET first_name = $2::VARCHAR, \
                middle_name = $3::VARCHAR, \
                last_name = $4::VARCHAR, \
                email = $5::VARCHAR, \
                mobile_number = $6::VARCHAR, \
                residential_address = $7::VARCHAR, \
                contract_type = $8::INT2, \
                employment_type = $9::INT2, \
                start_date = $10::DATE, \
                finish_date = $11::DATE, \
                ongoing = $12::BOOLEAN, \
                salary_amount = $13::NUMERIC, \
                salary_currency = $14::INT2, \
                hours_per_week = $15::INT2 \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &id,
                &first_name,
                &middle_name,
                &last_name,
                &email,
                &mobile_number,
                &residential_address,
                &contract_type,
                &employment_type,
                &start_date,
                &finish_date,
                &ongoing,
                &salary_amount,
                &salary_currency,
                &hours_per_week,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

/// Locks the row of the [`Employee`] until the end of the current
/// transaction.
///
/// Concurrent [`Lock`]s of the same [`Employee`] wait for each other. Does
/// nothing if the [`Employee`] doesn't exist.
impl<C> Database<Lock<By<Employee, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT 1 \
            FROM employees \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Employee, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM employees \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
