//! Stored-procedure employee DAO.

use super::{list_call, paged_call, stream_rows};
use crate::dao::{EmployeeDao, EntityStream};
use crate::store::{first_row, ProcedureCall, ProcedureStore, SqlType, StoreRow};
use async_trait::async_trait;
use northwind_core::{
    require_positive_id, Employee, EmployeeId, EntityKind, EntityNotFound, Lookup, NorthwindResult,
    ValidateExt,
};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Employee DAO over the `*_Employee` / `*_Employees` procedures.
#[derive(Component, Clone)]
#[shaku(interface = EmployeeDao)]
pub struct SqlEmployeeDao {
    #[shaku(inject)]
    store: Arc<dyn ProcedureStore>,
}

impl SqlEmployeeDao {
    #[must_use]
    pub fn new(store: Arc<dyn ProcedureStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for SqlEmployeeDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlEmployeeDao").finish_non_exhaustive()
    }
}

fn bind_columns(call: ProcedureCall, e: &Employee) -> ProcedureCall {
    call.param("LastName", SqlType::NVarChar(20), e.last_name.as_str())
        .param("FirstName", SqlType::NVarChar(10), e.first_name.as_str())
        .nullable("Title", SqlType::NVarChar(30), e.title.as_deref())
        .nullable("TitleOfCourtesy", SqlType::NVarChar(25), e.title_of_courtesy.as_deref())
        .nullable("BirthDate", SqlType::DateTime, e.birth_date)
        .nullable("HireDate", SqlType::DateTime, e.hire_date)
        .nullable("Address", SqlType::NVarChar(60), e.address.as_deref())
        .nullable("City", SqlType::NVarChar(15), e.city.as_deref())
        .nullable("Region", SqlType::NVarChar(15), e.region.as_deref())
        .nullable("PostalCode", SqlType::NVarChar(10), e.postal_code.as_deref())
        .nullable("Country", SqlType::NVarChar(15), e.country.as_deref())
        .nullable("HomePhone", SqlType::NVarChar(24), e.home_phone.as_deref())
        .nullable("Extension", SqlType::NVarChar(4), e.extension.as_deref())
        .nullable("Photo", SqlType::Image, e.photo.as_deref())
        .nullable("Notes", SqlType::NText, e.notes.as_deref())
        .nullable("ReportsTo", SqlType::Int, e.reports_to)
        .nullable("PhotoPath", SqlType::NVarChar(255), e.photo_path.as_deref())
}

fn employee_from_row(row: &StoreRow) -> NorthwindResult<Employee> {
    Ok(Employee {
        id: EmployeeId::new(row.get("EmployeeID")?),
        last_name: row.get("LastName")?,
        first_name: row.get("FirstName")?,
        title: row.get_opt("Title")?,
        title_of_courtesy: row.get_opt("TitleOfCourtesy")?,
        birth_date: row.get_opt("BirthDate")?,
        hire_date: row.get_opt("HireDate")?,
        address: row.get_opt("Address")?,
        city: row.get_opt("City")?,
        region: row.get_opt("Region")?,
        postal_code: row.get_opt("PostalCode")?,
        country: row.get_opt("Country")?,
        home_phone: row.get_opt("HomePhone")?,
        extension: row.get_opt("Extension")?,
        photo: row.get_opt("Photo")?,
        notes: row.get_opt("Notes")?,
        reports_to: row.get_opt("ReportsTo")?.map(EmployeeId::new),
        photo_path: row.get_opt("PhotoPath")?,
    })
}

#[async_trait]
impl EmployeeDao for SqlEmployeeDao {
    async fn insert(&self, employee: &Employee) -> NorthwindResult<u64> {
        employee.validate_fields("employee")?;
        debug!("Inserting employee: {}", employee.full_name());

        let call = bind_columns(ProcedureCall::new("Insert_Employee"), employee);
        self.store.execute(call).await
    }

    async fn delete(&self, id: EmployeeId) -> NorthwindResult<bool> {
        require_positive_id("employee_id", id.get())?;
        debug!("Deleting employee: {}", id);

        let call = ProcedureCall::new("Delete_Employee").param("EmployeeID", SqlType::Int, id);
        Ok(self.store.execute(call).await? > 0)
    }

    async fn find(&self, id: EmployeeId) -> NorthwindResult<Lookup<Employee>> {
        require_positive_id("employee_id", id.get())?;
        debug!("Finding employee by id: {}", id);

        let call = ProcedureCall::new("Get_Employee_By_Id").param("EmployeeID", SqlType::Int, id);
        let Some(row) = first_row(self.store.query(call)).await? else {
            return Ok(Lookup::NotFound(EntityNotFound::new(EntityKind::Employee, id.get())));
        };
        employee_from_row(&row).map(Lookup::Found)
    }

    async fn update(&self, employee: &Employee) -> NorthwindResult<bool> {
        require_positive_id("employee.id", employee.id.get())?;
        employee.validate_fields("employee")?;
        debug!("Updating employee: {}", employee.id);

        let call = bind_columns(ProcedureCall::new("Update_Employee"), employee).param(
            "EmployeeID",
            SqlType::Int,
            employee.id,
        );
        Ok(self.store.execute(call).await? > 0)
    }

    fn select_all(&self) -> EntityStream<Employee> {
        debug!("Selecting all employees");
        stream_rows(
            self.store.as_ref(),
            Some(ProcedureCall::new("Get_Employees")),
            employee_from_row,
        )
    }

    fn select_paged(&self, offset: i64, limit: i64) -> NorthwindResult<EntityStream<Employee>> {
        let call = paged_call("Get_Employees_With_Limit", offset, limit)?;
        debug!(offset, limit, "Selecting employees page");
        Ok(stream_rows(self.store.as_ref(), call, employee_from_row))
    }

    /// Matches on last name.
    fn select_by_names(&self, names: &[String]) -> NorthwindResult<EntityStream<Employee>> {
        let call = list_call("Get_Employees_By_Names", "Names", "employee_names", names)?;
        debug!("Selecting employees by last names: {:?}", names);
        Ok(stream_rows(self.store.as_ref(), Some(call), employee_from_row))
    }
}
