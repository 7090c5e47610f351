//! Student management screen.
//!
//! Server-filtered strategy: the user narrows down Department -> Batch ->
//! optional Roll Number, then triggers an explicit `search`; the server
//! returns the filtered set and the pager slices it locally. Every mutation
//! is followed by re-running the search instead of patching the table.

use anyhow::Result;
use tracing::warn;

use super::cascade::{Cascade, CascadeOption, FilterChain};
use super::form::{FormMode, StudentForm, StudentPayload};
use super::pager::Pager;
use super::{confirm, prompt, read_command, split_command, truncate};
use crate::api::types::Student;
use crate::api::ApiClient;

pub async fn run(client: &ApiClient, page_size: usize) -> Result<()> {
    let mut screen = StudentsScreen::new(page_size);
    screen.load_departments(client).await;

    println!();
    println!("=== Manage Students ===  (type 'help' for commands)");

    loop {
        let line = read_command("students> ")?;
        let (command, arg) = split_command(&line);

        match command {
            "" => {}
            "help" => print_help(),
            "dept" => screen.cmd_dept(client, arg).await,
            "batch" => screen.cmd_batch(client, arg).await,
            "roll" => screen.cmd_roll(arg),
            "filters" => screen.print_filters(),
            "search" => screen.run_search(client).await,
            "next" => {
                if screen.pager.next_page() {
                    screen.print_table();
                } else {
                    println!("Already on the last page.");
                }
            }
            "prev" => {
                if screen.pager.prev_page() {
                    screen.print_table();
                } else {
                    println!("Already on the first page.");
                }
            }
            "show" => screen.cmd_show(client, arg).await,
            "add" => screen.cmd_add(client).await?,
            "edit" => screen.cmd_edit(client, arg).await?,
            "delete" => screen.cmd_delete(client, arg).await?,
            "refresh" => screen.run_search(client).await,
            "back" | "exit" | "quit" => break,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  dept [<id>|clear]     select a department (no arg lists options)");
    println!("  batch [<id>|clear]    select a batch of the chosen department");
    println!("  roll [<roll>|clear]   narrow to one roll number (optional)");
    println!("  filters               show the current selection");
    println!("  search                fetch students matching the filters");
    println!("  next / prev           page through the results");
    println!("  show <roll>           full details of one student");
    println!("  add                   create a student");
    println!("  edit <roll>           edit a student");
    println!("  delete <roll>         delete a student (asks for confirmation)");
    println!("  refresh               re-run the current search");
    println!("  back                  leave this screen");
}

/// True when the given roll number is part of the currently displayed result
/// set - the condition for re-running the search after a delete.
fn is_displayed(items: &[Student], roll_number: &str) -> bool {
    items.iter().any(|s| s.roll_number == roll_number)
}

struct StudentsScreen {
    filters: FilterChain,
    pager: Pager<Student>,
}

impl StudentsScreen {
    fn new(page_size: usize) -> Self {
        Self {
            filters: FilterChain::new(),
            pager: Pager::new(page_size),
        }
    }

    async fn load_departments(&mut self, client: &ApiClient) {
        let generation = self.filters.departments.begin_reload();
        let options = match client.departments_dropdown().await {
            Ok(options) => options,
            Err(e) => {
                warn!("Failed to fetch departments: {e}");
                Vec::new()
            }
        };
        self.filters.departments.apply(generation, options);
    }

    async fn cmd_dept(&mut self, client: &ApiClient, arg: &str) {
        if arg.is_empty() {
            print_options("Departments", &self.filters.departments);
            return;
        }
        if arg == "clear" {
            self.filters.clear_department();
            println!("Department cleared.");
            return;
        }

        let generation = match self.filters.select_department(arg) {
            Ok(generation) => generation,
            Err(e) => {
                println!("{}", e);
                return;
            }
        };
        let Some(department_id) = self.filters.department_id() else {
            return;
        };

        // Batches for the previous department are already invalidated; fetch
        // the new set under the tag we were handed.
        let options = match client.batches_dropdown(department_id).await {
            Ok(options) => options,
            Err(e) => {
                warn!("Failed to fetch batches for department {department_id}: {e}");
                Vec::new()
            }
        };
        if self.filters.batches.apply(generation, options) {
            println!(
                "Department set to {}. {} batch(es) available.",
                self.filters.departments.selected_label().unwrap_or_default(),
                self.filters.batches.options().len()
            );
        }
    }

    async fn cmd_batch(&mut self, client: &ApiClient, arg: &str) {
        if arg.is_empty() {
            print_options("Batches", &self.filters.batches);
            return;
        }
        if arg == "clear" {
            self.filters.clear_batch();
            println!("Batch cleared.");
            return;
        }

        let generation = match self.filters.select_batch(arg) {
            Ok(generation) => generation,
            Err(e) => {
                println!("{}", e);
                return;
            }
        };
        let (Some(department_id), Some(batch_id)) =
            (self.filters.department_id(), self.filters.batch_id())
        else {
            return;
        };

        let options = match client.class_roll_numbers(department_id, batch_id).await {
            Ok(options) => options,
            Err(e) => {
                warn!("Failed to fetch roll numbers for batch {batch_id}: {e}");
                Vec::new()
            }
        };
        if self.filters.rolls.apply(generation, options) {
            println!(
                "Batch set to {}. {} roll number(s) in this class.",
                self.filters.batches.selected_label().unwrap_or_default(),
                self.filters.rolls.options().len()
            );
        }
    }

    fn cmd_roll(&mut self, arg: &str) {
        if arg.is_empty() {
            print_options("Roll numbers", &self.filters.rolls);
            return;
        }
        if arg == "clear" {
            self.filters.clear_roll();
            println!("Roll number cleared (searching the whole batch).");
            return;
        }
        match self.filters.select_roll(arg) {
            Ok(()) => println!("Roll number set to {arg}."),
            Err(e) => println!("{}", e),
        }
    }

    fn print_filters(&self) {
        let department = self
            .filters
            .departments
            .selected_label()
            .unwrap_or_else(|| "-".to_string());
        let batch = self
            .filters
            .batches
            .selected_label()
            .unwrap_or_else(|| "-".to_string());
        let roll = self
            .filters
            .rolls
            .selected_key()
            .unwrap_or("(all)")
            .to_string();
        println!("Department: {department}  |  Batch: {batch}  |  Roll: {roll}");
    }

    /// Run the search for the current filters. Both department and batch must
    /// be chosen; a failed fetch degrades to an empty table with a logged
    /// diagnostic.
    async fn run_search(&mut self, client: &ApiClient) {
        let Some(query) = self.filters.query() else {
            println!("Please select both a department and a batch before searching.");
            return;
        };

        println!("Fetching student data...");
        let rows = match client
            .search_students(
                query.department_id,
                query.batch_id,
                query.roll_number.as_deref(),
            )
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Student search failed: {e}");
                Vec::new()
            }
        };

        self.pager.set_items(rows);
        self.print_table();
    }

    fn print_table(&self) {
        if self.pager.is_empty() {
            println!("No students found. Try adjusting your filters.");
            return;
        }

        println!();
        println!(
            "{:<14}  {:<24}  {:<26}  {:<20}  {:<14}",
            "ROLL", "NAME", "EMAIL", "DEPARTMENT", "PHONE"
        );
        println!("{}", "-".repeat(104));
        for student in self.pager.visible() {
            println!(
                "{:<14}  {:<24}  {:<26}  {:<20}  {:<14}",
                truncate(&student.roll_number, 14),
                truncate(&student.full_name(), 24),
                truncate(student.email.as_deref().unwrap_or("-"), 26),
                truncate(student.department_name().unwrap_or("-"), 20),
                truncate(&student.phone_number, 14),
            );
        }
        println!();
        println!(
            "{} (page {} of {})",
            self.pager.summary(),
            self.pager.current_page(),
            self.pager.total_pages()
        );
    }

    async fn cmd_show(&self, client: &ApiClient, roll_number: &str) {
        if roll_number.is_empty() {
            println!("Usage: show <roll-number>");
            return;
        }
        match client.get_student(roll_number).await {
            Ok(student) => print_student(&student),
            Err(e) => println!("{}", e.surface_message()),
        }
    }

    async fn cmd_add(&mut self, client: &ApiClient) -> Result<()> {
        if student_form_flow(client, StudentForm::new()).await? {
            self.refresh_after_mutation(client).await;
        }
        Ok(())
    }

    async fn cmd_edit(&mut self, client: &ApiClient, roll_number: &str) -> Result<()> {
        if roll_number.is_empty() {
            println!("Usage: edit <roll-number>");
            return Ok(());
        }

        // Prefer the record we already display; fall back to a fetch so a
        // student outside the current result set can still be edited.
        let record = match self
            .pager
            .items()
            .iter()
            .find(|s| s.roll_number == roll_number)
            .cloned()
        {
            Some(record) => record,
            None => match client.get_student(roll_number).await {
                Ok(record) => record,
                Err(e) => {
                    println!("{}", e.surface_message());
                    return Ok(());
                }
            },
        };

        if student_form_flow(client, StudentForm::from_record(&record)).await? {
            self.refresh_after_mutation(client).await;
        }
        Ok(())
    }

    async fn cmd_delete(&mut self, client: &ApiClient, roll_number: &str) -> Result<()> {
        if roll_number.is_empty() {
            println!("Usage: delete <roll-number>");
            return Ok(());
        }
        if !confirm(&format!(
            "Delete student {}? This cannot be undone.",
            roll_number
        ))? {
            println!("Cancelled.");
            return Ok(());
        }

        let was_displayed = is_displayed(self.pager.items(), roll_number);
        match client.delete_student(roll_number).await {
            Ok(()) => {
                println!("Student {} deleted.", roll_number);
                if was_displayed {
                    self.run_search(client).await;
                }
            }
            Err(e) => println!("Delete failed: {}", e.surface_message()),
        }
        Ok(())
    }

    /// Server-truth refresh after a successful create/update: re-run the
    /// search when the filters allow one, never patch the table locally.
    async fn refresh_after_mutation(&mut self, client: &ApiClient) {
        if self.filters.query().is_some() {
            self.run_search(client).await;
        }
    }
}

fn print_options<T: CascadeOption>(title: &str, cascade: &Cascade<T>) {
    if cascade.is_pending() {
        println!("{title}: loading...");
        return;
    }
    if cascade.options().is_empty() {
        println!("{title}: no options available (select the level above first).");
        return;
    }
    println!("{title}:");
    for option in cascade.options() {
        println!("  {:>8}  {}", option.key(), option.label());
    }
}

fn print_student(student: &Student) {
    println!();
    println!("=== Student: {} ===", student.full_name());
    println!();
    println!("Roll number:   {}", student.roll_number);
    println!("Email:         {}", student.email.as_deref().unwrap_or("-"));
    println!("Father's name: {}", student.father_name);
    println!("Mother's name: {}", student.mother_name);
    println!("Date of birth: {}", student.date_of_birth);
    println!("Phone:         {}", student.phone_number);
    println!("Address:       {}", student.address);
    println!(
        "Department:    {} (id {})",
        student.department_name().unwrap_or("-"),
        student.department_id
    );
    println!("Batch id:      {}", student.batch_id);
    println!();
}

/// Fill-validate-submit loop for a student draft. The draft survives both
/// validation failures and server rejections; it is only dropped when the
/// user gives up or the submission succeeds.
async fn student_form_flow(client: &ApiClient, mut form: StudentForm) -> Result<bool> {
    let heading = match form.mode() {
        FormMode::Create => "Add a new student",
        FormMode::Edit => "Edit student",
    };
    println!();
    println!("--- {heading} (empty input keeps the shown value) ---");

    loop {
        fill_student_form(client, &mut form).await?;

        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(e) => {
                println!("[!!] {}", e);
                if !confirm("Edit the form again?")? {
                    println!("Discarded.");
                    return Ok(false);
                }
                continue;
            }
        };

        let result = match &payload {
            StudentPayload::Create(new_student) => client
                .create_student(new_student)
                .await
                .map(|_| "created"),
            StudentPayload::Update { roll_number, patch } => client
                .update_student(roll_number, patch)
                .await
                .map(|_| "updated"),
        };

        match result {
            Ok(what) => {
                println!("[OK] Student {what} successfully.");
                return Ok(true);
            }
            Err(e) => {
                println!("[!!] {}", e.surface_message());
                if !confirm("Edit the form again?")? {
                    println!("Discarded.");
                    return Ok(false);
                }
            }
        }
    }
}

async fn fill_student_form(client: &ApiClient, form: &mut StudentForm) -> Result<()> {
    form.first_name = prompt("First name", &form.first_name)?;
    form.last_name = prompt("Last name", &form.last_name)?;
    form.father_name = prompt("Father's name", &form.father_name)?;
    form.mother_name = prompt("Mother's name", &form.mother_name)?;
    form.date_of_birth = prompt("Date of birth (YYYY-MM-DD)", &form.date_of_birth)?;

    if form.key_locked() {
        println!("Roll number: {} (cannot be changed)", form.roll_number);
        println!("Email:       {} (cannot be changed)", form.email);
    } else {
        form.roll_number = prompt("Roll number", &form.roll_number)?;
        form.email = prompt("Email", &form.email)?;
    }

    // The form keeps its own department/batch cascade, independent of the
    // screen filters.
    match client.departments_dropdown().await {
        Ok(options) => {
            println!("Departments:");
            for department in &options {
                println!(
                    "  {:>8}  {}",
                    department.department_id, department.department_name
                );
            }
        }
        Err(e) => warn!("Failed to fetch departments for the form: {e}"),
    }
    form.department_id = prompt("Department id", &form.department_id)?;

    if let Ok(department_id) = form.department_id.trim().parse::<i64>() {
        match client.batches_dropdown(department_id).await {
            Ok(options) => {
                println!("Batches:");
                for batch in &options {
                    println!("  {:>8}  {}", batch.batch_id, batch.batch_name);
                }
            }
            Err(e) => warn!("Failed to fetch batches for the form: {e}"),
        }
    }
    form.batch_id = prompt("Batch id", &form.batch_id)?;

    form.phone_number = prompt("Phone number", &form.phone_number)?;
    form.address = prompt("Address", &form.address)?;

    if form.mode() == FormMode::Create {
        form.password = prompt("Password", &form.password)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(roll: &str) -> Student {
        serde_json::from_str(&format!(
            r#"{{
                "student_id": 1,
                "first_name": "Ana",
                "last_name": "Khan",
                "father_name": "Omar",
                "mother_name": "Sara",
                "roll_number": "{roll}",
                "batch_id": 3,
                "department_id": 1,
                "date_of_birth": "2002-05-17",
                "address": "12 College Road",
                "phone_number": "0300-1234567"
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn delete_refresh_only_when_record_was_displayed() {
        let displayed = vec![student("CS-1"), student("CS-2")];
        assert!(is_displayed(&displayed, "CS-2"));
        assert!(!is_displayed(&displayed, "EE-9"));
        assert!(!is_displayed(&[], "CS-1"));
    }

}
