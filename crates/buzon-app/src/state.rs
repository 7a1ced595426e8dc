// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Route marker that gates the admin flow. This is the only route besides
/// the public form.
pub const ADMIN_ROUTE: &str = "admin-panel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    AdminPanel,
}

impl Route {
    pub fn parse(fragment: &str) -> Self {
        if fragment.trim() == ADMIN_ROUTE {
            Self::AdminPanel
        } else {
            Self::Home
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "",
            Self::AdminPanel => ADMIN_ROUTE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PublicForm,
    LoginGate,
    AdminPanel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub route: Route,
    pub authenticated: bool,
    pub search_query: String,
    pub sort_ascending: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::PublicForm,
            route: Route::Home,
            authenticated: false,
            search_query: String::new(),
            // Most-recent-first is the default ordering.
            sort_ascending: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    LoginSucceeded,
    LoginFailed,
    CancelLogin,
    Logout,
    SetSearchQuery(String),
    ToggleSortDirection,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    RouteChanged(Route),
    AuthenticationChanged(bool),
    SearchChanged(String),
    SortDirectionChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    /// Applies one command and reports what changed. The transition table
    /// mirrors the admin navigation flow: the admin route shows the login
    /// gate until authenticated, and leaving the route drops authentication.
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => self.navigate(route),
            AppCommand::LoginSucceeded => {
                if self.screen != Screen::LoginGate {
                    return Vec::new();
                }
                self.authenticated = true;
                self.screen = Screen::AdminPanel;
                vec![
                    AppEvent::AuthenticationChanged(true),
                    AppEvent::ScreenChanged(self.screen),
                    self.set_status("logged in"),
                ]
            }
            AppCommand::LoginFailed => {
                // Stay on the gate; the auth flag is untouched.
                vec![self.set_status("wrong username or password")]
            }
            AppCommand::CancelLogin => self.leave_admin("login canceled"),
            AppCommand::Logout => self.leave_admin("logged out"),
            AppCommand::SetSearchQuery(query) => {
                self.search_query = query.clone();
                vec![AppEvent::SearchChanged(query)]
            }
            AppCommand::ToggleSortDirection => {
                self.sort_ascending = !self.sort_ascending;
                let label = if self.sort_ascending {
                    "oldest first"
                } else {
                    "newest first"
                };
                vec![
                    AppEvent::SortDirectionChanged(self.sort_ascending),
                    self.set_status(label),
                ]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn navigate(&mut self, route: Route) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if self.route != route {
            self.route = route;
            events.push(AppEvent::RouteChanged(route));
        }

        let next = match route {
            Route::Home => Screen::PublicForm,
            Route::AdminPanel if self.authenticated => Screen::AdminPanel,
            Route::AdminPanel => Screen::LoginGate,
        };

        // Leaving the admin route ends the session.
        if route == Route::Home && self.authenticated {
            self.authenticated = false;
            events.push(AppEvent::AuthenticationChanged(false));
        }

        if self.screen != next {
            self.screen = next;
            events.push(AppEvent::ScreenChanged(next));
        }
        events
    }

    fn leave_admin(&mut self, label: &str) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if self.route != Route::Home {
            self.route = Route::Home;
            events.push(AppEvent::RouteChanged(Route::Home));
        }
        if self.authenticated {
            self.authenticated = false;
            events.push(AppEvent::AuthenticationChanged(false));
        }
        if self.screen != Screen::PublicForm {
            self.screen = Screen::PublicForm;
            events.push(AppEvent::ScreenChanged(Screen::PublicForm));
        }
        events.push(self.set_status(label));
        events
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
