//! Non-interactive subcommands. Each prints its result to stdout and fails
//! with a non-zero exit on write or validation errors.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, Utc};
use staffdesk_core::grid::{DataGrid, GridRow};
use staffdesk_core::services::employee_service::{
    created_message, deleted_message, fetched_message, updated_message,
};
use staffdesk_core::services::login_service::{login_message, logout_message};
use staffdesk_core::services::{DayWindows, EmployeeForm};
use staffdesk_store::Employee;

use crate::context::Context;

pub async fn dashboard(ctx: &Context, json: bool) -> Result<()> {
    let summary = ctx.metrics.dashboard(DayWindows::now()).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    for card in summary.cards() {
        println!("{:<20} {:>6}   {}", card.title, card.count, card.route());
    }
    Ok(())
}

pub async fn list(ctx: &Context, search: Option<String>, page: usize) -> Result<()> {
    let rows = ctx.employees.list_active().await?;
    eprintln!("{}", fetched_message(rows.len()));

    let mut grid = DataGrid::new(ctx.settings.grid.page_length);
    grid.set_rows(rows);
    if let Some(search) = search {
        grid.set_search(search);
    }
    for _ in 1..page {
        grid.next_page();
    }

    print_grid(&grid.page_rows());
    println!("{}", grid.info());
    Ok(())
}

pub async fn report(ctx: &Context, filter: Option<String>) -> Result<()> {
    let page = ctx
        .reports
        .fetch(filter.as_deref(), &DayWindows::now())
        .await;

    println!("{}", page.title);
    if let Some(error) = &page.error {
        eprintln!("{error}");
    }
    for employee in &page.rows {
        println!(
            "{:<8} {:<20} {:<28} {:<11} {:<17} {:<17} {:<17} {}",
            employee.code(),
            employee.name,
            employee.email,
            employee
                .login_status
                .map(|s| s.as_str())
                .unwrap_or("-"),
            local_time(Some(employee.created_at)),
            local_time(employee.last_login),
            local_time(employee.deleted_at),
            employee.deleted_by.as_deref().unwrap_or("-"),
        );
    }
    println!("{} rows", page.rows.len());
    Ok(())
}

pub async fn add(ctx: &Context, form: EmployeeForm) -> Result<()> {
    let created = ctx.employees.create(&form).await?;
    println!("{}", created_message(&created));
    Ok(())
}

pub struct EditArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
}

/// Loads the record, overlays the given fields and saves it.
pub async fn edit(ctx: &Context, id: i64, args: EditArgs) -> Result<()> {
    let existing = ctx
        .employees
        .find(id)
        .await?
        .ok_or_else(|| anyhow!("no employee with id {id}"))?;
    if !existing.is_active() {
        bail!("employee {} is deleted", existing.code());
    }

    let mut form = EmployeeForm::from_employee(&existing);
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(email) = args.email {
        form.email = email;
    }
    if let Some(department) = args.department {
        form.department = department;
    }
    if let Some(role) = args.role {
        form.role = role;
    }

    let updated = ctx.employees.update(id, &form).await?;
    println!("{}", updated_message(&updated));
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64, by: &str) -> Result<()> {
    let deleted = ctx.employees.soft_delete(id, by).await?;
    println!("{}", deleted_message(&deleted));
    Ok(())
}

pub async fn login(ctx: &Context, email: &str, code: &str) -> Result<()> {
    let challenge = ctx.login.start(email).await?;
    let employee = ctx.login.verify(&challenge, code).await?;
    println!("{}", login_message(&employee));
    Ok(())
}

pub async fn logout(ctx: &Context, id: i64) -> Result<()> {
    let employee = ctx.login.logout(id).await?;
    println!("{}", logout_message(&employee));
    Ok(())
}

fn print_grid(rows: &[&Employee]) {
    let headers = Employee::headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(row.cell(i).chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers.iter().map(|h| h.to_string()).collect()));
    for row in rows {
        println!("{}", line((0..headers.len()).map(|i| row.cell(i)).collect()));
    }
}

pub fn local_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| {
        at.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    })
    .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use staffdesk_core::Settings;
    use staffdesk_store::MemoryStore;
    use std::sync::Arc;

    use crate::demo;

    fn context() -> (Arc<MemoryStore>, Context) {
        let store = Arc::new(MemoryStore::with_rows(demo::rows(Utc::now())));
        let ctx = Context::with_store(Settings::default(), true, store.clone());
        (store, ctx)
    }

    fn no_changes() -> EditArgs {
        EditArgs {
            name: None,
            email: None,
            department: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_edit_overlays_only_given_fields() {
        let (store, ctx) = context();
        let before = store.snapshot()[0].clone();

        let args = EditArgs {
            role: Some("Staff Engineer".to_string()),
            ..no_changes()
        };
        edit(&ctx, before.id, args).await.unwrap();

        let after = store.snapshot()[0].clone();
        assert_eq!(after.role.as_deref(), Some("Staff Engineer"));
        assert_eq!(after.name, before.name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.department, before.department);
        assert_eq!(after.emp_code, before.emp_code);
    }

    #[tokio::test]
    async fn test_edit_rejects_missing_and_deleted_rows() {
        let (store, ctx) = context();
        assert!(edit(&ctx, 999, no_changes()).await.is_err());

        let deleted = store
            .snapshot()
            .into_iter()
            .find(|e| !e.is_active())
            .unwrap();
        let err = edit(&ctx, deleted.id, no_changes()).await.unwrap_err();
        assert!(err.to_string().contains("is deleted"));
        assert_eq!(store.snapshot().iter().find(|e| e.id == deleted.id), Some(&deleted));
    }
}
