//! Demo login dialog state.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::events::AppEvent;
use crate::services::login_service::{login_message, logout_message, sanitize_code, CODE_LENGTH};
use crate::services::{LoginChallenge, LoginService};

#[derive(Debug, Clone, PartialEq)]
pub enum LoginStep {
    Email,
    Code(LoginChallenge),
}

pub struct LoginViewModel {
    pub step: LoginStep,
    pub email: String,
    pub code: String,
    pub error: Option<String>,
    pub is_loading: bool,
    service: Arc<LoginService>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl LoginViewModel {
    pub fn new(service: Arc<LoginService>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            step: LoginStep::Email,
            email: String::with_capacity(100),
            code: String::with_capacity(CODE_LENGTH),
            error: None,
            is_loading: false,
            service,
            event_tx,
        }
    }

    pub fn reset(&mut self) {
        self.step = LoginStep::Email;
        self.email.clear();
        self.code.clear();
        self.error = None;
        self.is_loading = false;
    }

    /// Types into the field of the current step. The code field only takes
    /// digits, up to four.
    pub fn input(&mut self, c: char) {
        match self.step {
            LoginStep::Email => self.email.push(c),
            LoginStep::Code(_) => {
                let mut code = std::mem::take(&mut self.code);
                code.push(c);
                self.code = sanitize_code(&code);
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.step {
            LoginStep::Email => self.email.pop(),
            LoginStep::Code(_) => self.code.pop(),
        };
    }

    /// Submits the current step in the background.
    pub fn submit(&mut self) {
        if self.is_loading {
            return;
        }
        self.error = None;

        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        match &self.step {
            LoginStep::Email => {
                let email = self.email.trim().to_string();
                self.is_loading = true;
                tokio::spawn(async move {
                    let result = service.start(&email).await.map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::LoginStarted(result));
                });
            }
            LoginStep::Code(challenge) => {
                let challenge = challenge.clone();
                let code = self.code.clone();
                self.is_loading = true;
                tokio::spawn(async move {
                    let result = service
                        .verify(&challenge, &code)
                        .await
                        .map(|e| login_message(&e))
                        .map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::LoginFinished(result));
                });
            }
        }
    }

    pub fn on_started(&mut self, result: Result<LoginChallenge, String>) {
        self.is_loading = false;
        match result {
            Ok(challenge) => {
                self.code.clear();
                self.step = LoginStep::Code(challenge);
            }
            Err(e) => self.error = Some(e),
        }
    }

    /// On success the dialog resets and the message is returned for display.
    pub fn on_finished(&mut self, result: Result<String, String>) -> Option<String> {
        self.is_loading = false;
        match result {
            Ok(message) => {
                self.reset();
                Some(message)
            }
            Err(e) => {
                self.code.clear();
                self.error = Some(e);
                None
            }
        }
    }

    /// Marks an employee logged out. Reported as a write.
    pub fn logout(&self, id: i64) {
        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = service
                .logout(id)
                .await
                .map(|e| logout_message(&e))
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::WriteFinished(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::employee_at;
    use chrono::Utc;
    use staffdesk_store::MemoryStore;

    fn vm() -> (LoginViewModel, mpsc::UnboundedReceiver<AppEvent>) {
        let store = Arc::new(MemoryStore::with_rows(vec![employee_at(1, Utc::now())]));
        let (tx, rx) = mpsc::unbounded_channel();
        (LoginViewModel::new(Arc::new(LoginService::new(store, "1234")), tx), rx)
    }

    #[tokio::test]
    async fn test_two_step_login() {
        let (mut vm, mut rx) = vm();
        for c in "employee1@example.com".chars() {
            vm.input(c);
        }
        vm.submit();
        match rx.recv().await.unwrap() {
            AppEvent::LoginStarted(result) => vm.on_started(result),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(matches!(vm.step, LoginStep::Code(_)));

        for c in "1a2345".chars() {
            vm.input(c);
        }
        assert_eq!(vm.code, "1234");

        vm.submit();
        let message = match rx.recv().await.unwrap() {
            AppEvent::LoginFinished(result) => vm.on_finished(result),
            other => panic!("unexpected event {other:?}"),
        };
        assert_eq!(
            message.as_deref(),
            Some("EMP0001 (Employee 1) Logged In Successfully")
        );
        assert_eq!(vm.step, LoginStep::Email);
    }

    #[tokio::test]
    async fn test_unknown_email_stays_on_first_step() {
        let (mut vm, mut rx) = vm();
        vm.email = "ghost@example.com".into();
        vm.submit();
        match rx.recv().await.unwrap() {
            AppEvent::LoginStarted(result) => vm.on_started(result),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(vm.step, LoginStep::Email);
        assert_eq!(vm.error.as_deref(), Some("Email not found in database."));
    }
}
