//! Teacher management screen.
//!
//! Full-load strategy: the teacher list is small enough to fetch once up
//! front, so filtering is an immediate case-insensitive substring match over
//! name and email with no server round trip. Mutations still go through the
//! server and are followed by a full re-fetch.

use anyhow::Result;
use tracing::warn;

use super::form::{FormMode, TeacherForm, TeacherPayload};
use super::pager::Pager;
use super::{confirm, prompt, read_command, split_command, truncate};
use crate::api::types::Teacher;
use crate::api::ApiClient;

pub async fn run(client: &ApiClient, page_size: usize) -> Result<()> {
    let mut screen = TeachersScreen::new(page_size);
    screen.refresh(client).await;

    println!();
    println!("=== Manage Teachers ===  (type 'help' for commands)");
    screen.print_table();

    loop {
        let line = read_command("teachers> ")?;
        let (command, arg) = split_command(&line);

        match command {
            "" => {}
            "help" => print_help(),
            "filter" => {
                screen.set_filter(arg);
                screen.print_table();
            }
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
            "refresh" => {
                screen.refresh(client).await;
                screen.print_table();
            }
            "back" | "exit" | "quit" => break,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  filter [<text>]       narrow by name or email (no arg clears)");
    println!("  next / prev           page through the results");
    println!("  show <email>          full details of one teacher");
    println!("  add                   create a teacher");
    println!("  edit <email>          edit a teacher");
    println!("  delete <email>        delete a teacher (asks for confirmation)");
    println!("  refresh               re-fetch the full list");
    println!("  back                  leave this screen");
}

/// Case-insensitive substring match over first name, last name, and email.
fn filter_teachers(all: &[Teacher], query: &str) -> Vec<Teacher> {
    if query.is_empty() {
        return all.to_vec();
    }
    let needle = query.to_lowercase();
    let matches = |field: &Option<String>| {
        field
            .as_deref()
            .map(|v| v.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };
    all.iter()
        .filter(|t| matches(&t.first_name) || matches(&t.last_name) || matches(&t.email))
        .cloned()
        .collect()
}

struct TeachersScreen {
    all: Vec<Teacher>,
    query: String,
    pager: Pager<Teacher>,
}

impl TeachersScreen {
    fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            query: String::new(),
            pager: Pager::new(page_size),
        }
    }

    /// Fetch the authoritative list. On failure the previous list is kept so
    /// the screen stays usable for another try.
    async fn refresh(&mut self, client: &ApiClient) {
        println!("Loading teachers...");
        match client.get_all_teachers().await {
            Ok(all) => {
                self.all = all;
                self.apply_filter();
            }
            Err(e) => {
                warn!("Failed to fetch teachers: {e}");
                println!("Could not load teachers: {}", e.surface_message());
            }
        }
    }

    fn set_filter(&mut self, query: &str) {
        self.query = query.to_string();
        if query.is_empty() {
            println!("Filter cleared.");
        }
        self.apply_filter();
    }

    /// Re-derive the table from the full list; like any result-set
    /// replacement this snaps back to page 1.
    fn apply_filter(&mut self) {
        self.pager.set_items(filter_teachers(&self.all, &self.query));
    }

    fn print_table(&self) {
        if self.pager.is_empty() {
            println!("No teachers found matching your criteria.");
            return;
        }

        println!();
        println!(
            "{:<24}  {:<28}  {:<16}  {:<12}",
            "NAME", "EMAIL", "PHONE", "HIRED"
        );
        println!("{}", "-".repeat(86));
        for teacher in self.pager.visible() {
            let hired = teacher
                .hire_date
                .map(|d| d.date().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<24}  {:<28}  {:<16}  {:<12}",
                truncate(&teacher.full_name(), 24),
                truncate(teacher.email.as_deref().unwrap_or("-"), 28),
                truncate(teacher.phone_number.as_deref().unwrap_or("-"), 16),
                hired,
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

    fn find_by_email(&self, email: &str) -> Option<Teacher> {
        self.all
            .iter()
            .find(|t| t.email.as_deref() == Some(email))
            .cloned()
    }

    async fn cmd_show(&self, client: &ApiClient, email: &str) {
        if email.is_empty() {
            println!("Usage: show <email>");
            return;
        }
        match client.get_teacher(email).await {
            Ok(teacher) => print_teacher(&teacher, email),
            Err(e) => println!("{}", e.surface_message()),
        }
    }

    async fn cmd_add(&mut self, client: &ApiClient) -> Result<()> {
        if teacher_form_flow(client, TeacherForm::new()).await? {
            self.refresh(client).await;
            self.print_table();
        }
        Ok(())
    }

    async fn cmd_edit(&mut self, client: &ApiClient, email: &str) -> Result<()> {
        if email.is_empty() {
            println!("Usage: edit <email>");
            return Ok(());
        }

        let record = match self.find_by_email(email) {
            Some(record) => record,
            None => match client.get_teacher(email).await {
                Ok(record) => record,
                Err(e) => {
                    println!("{}", e.surface_message());
                    return Ok(());
                }
            },
        };

        if teacher_form_flow(client, TeacherForm::from_record(&record, email)).await? {
            self.refresh(client).await;
            self.print_table();
        }
        Ok(())
    }

    async fn cmd_delete(&mut self, client: &ApiClient, email: &str) -> Result<()> {
        if email.is_empty() {
            println!("Usage: delete <email>");
            return Ok(());
        }
        if !confirm(&format!("Delete teacher {}? This cannot be undone.", email))? {
            println!("Cancelled.");
            return Ok(());
        }

        match client.delete_teacher(email).await {
            Ok(()) => {
                println!("Teacher {} deleted.", email);
                self.refresh(client).await;
                self.print_table();
            }
            Err(e) => println!("Delete failed: {}", e.surface_message()),
        }
        Ok(())
    }
}

fn print_teacher(teacher: &Teacher, email: &str) {
    println!();
    println!("=== Teacher: {} ===", teacher.full_name());
    println!();
    println!(
        "Email:     {}",
        teacher.email.as_deref().unwrap_or(email)
    );
    println!(
        "Phone:     {}",
        teacher.phone_number.as_deref().unwrap_or("-")
    );
    println!(
        "Hire date: {}",
        teacher
            .hire_date
            .map(|d| d.date().to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Address:   {}", teacher.address.as_deref().unwrap_or("-"));
    println!();
}

/// Fill-validate-submit loop for a teacher draft; mirrors the student flow.
async fn teacher_form_flow(client: &ApiClient, mut form: TeacherForm) -> Result<bool> {
    let heading = match form.mode() {
        FormMode::Create => "Add a new teacher",
        FormMode::Edit => "Edit teacher",
    };
    println!();
    println!("--- {heading} (empty input keeps the shown value) ---");

    loop {
        fill_teacher_form(&mut form)?;

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
            TeacherPayload::Create(new_teacher) => client
                .create_teacher(new_teacher)
                .await
                .map(|_| "created"),
            TeacherPayload::Update { email, patch } => {
                client.update_teacher(email, patch).await.map(|_| "updated")
            }
        };

        match result {
            Ok(what) => {
                println!("[OK] Teacher {what} successfully.");
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

fn fill_teacher_form(form: &mut TeacherForm) -> Result<()> {
    form.first_name = prompt("First name", &form.first_name)?;
    form.last_name = prompt("Last name", &form.last_name)?;
    form.hire_date = prompt("Hire date (YYYY-MM-DD)", &form.hire_date)?;

    if form.key_locked() {
        println!("Email: {} (cannot be changed)", form.email);
    } else {
        form.email = prompt("Email", &form.email)?;
    }

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

    fn teacher(first: &str, last: &str, email: &str) -> Teacher {
        serde_json::from_str(&format!(
            r#"{{"first_name": "{first}", "last_name": "{last}", "email": "{email}"}}"#
        ))
        .unwrap()
    }

    fn roster() -> Vec<Teacher> {
        vec![
            teacher("Lena", "Ortiz", "lena@uni.edu"),
            teacher("Marcus", "Webb", "marcus.webb@uni.edu"),
            teacher("Priya", "Nair", "priya@uni.edu"),
        ]
    }

    #[test]
    fn filter_matches_name_and_email_case_insensitively() {
        let hits = filter_teachers(&roster(), "LENA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].email.as_deref(), Some("lena@uni.edu"));

        let hits = filter_teachers(&roster(), "webb");
        assert_eq!(hits.len(), 1);

        let hits = filter_teachers(&roster(), "uni.edu");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn empty_filter_returns_everyone() {
        assert_eq!(filter_teachers(&roster(), "").len(), 3);
    }

    #[test]
    fn sparse_records_never_match_nor_panic() {
        let sparse: Teacher = serde_json::from_str("{}").unwrap();
        let hits = filter_teachers(&[sparse], "lena");
        assert!(hits.is_empty());
    }

    #[test]
    fn changing_the_filter_resets_to_page_one() {
        let mut screen = TeachersScreen::new(2);
        screen.all = roster();
        screen.apply_filter();

        assert!(screen.pager.next_page());
        assert_eq!(screen.pager.current_page(), 2);

        screen.set_filter("uni.edu");
        assert_eq!(screen.pager.current_page(), 1);
        assert_eq!(screen.pager.len(), 3);
    }
}
