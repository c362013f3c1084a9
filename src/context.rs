//! Явный контекст приложения вместо глобальных синглтонов.
//!
//! Контекст создаётся при старте, передаётся в действия и сбрасывается
//! через [`AppContext::reset`] / [`AppContext::teardown`].

use std::sync::{Arc, Mutex};

use log::{error, info};

use crate::config::Preferences;
use crate::hierarchy::{FsListing, HierarchyBuilder};
use crate::logging;

/// Получатель человекочитаемых сообщений для строки статуса.
pub trait StatusSink: Send {
    fn report(&self, message: &str);

    fn report_error(&self, message: &str) {
        self.report(message);
    }
}

/// Пишет статус в лог.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn report(&self, message: &str) {
        info!(target: "prism_review::status", "{message}");
    }

    fn report_error(&self, message: &str) {
        error!(target: "prism_review::status", "{message}");
    }
}

/// Копит сообщения в памяти; clone делит один буфер.
#[derive(Debug, Default, Clone)]
pub struct MemoryStatusSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }
}

impl StatusSink for MemoryStatusSink {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Состояние приложения, разделяемое действиями.
pub struct AppContext {
    preferences: Preferences,
    /// Имя текущего шаблона графиков.
    current_template: Option<String>,
    status: Box<dyn StatusSink>,
}

impl AppContext {
    pub fn new(preferences: Preferences, status: impl StatusSink + 'static) -> Self {
        logging::init_logging();
        Self {
            preferences,
            current_template: None,
            status: Box::new(status),
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn current_template(&self) -> Option<&str> {
        self.current_template.as_deref()
    }

    pub fn set_current_template(&mut self, template: Option<String>) {
        self.current_template = template;
    }

    pub fn status(&self) -> &dyn StatusSink {
        self.status.as_ref()
    }

    /// Builder с порядком листинга из настроек.
    pub fn builder(&self) -> HierarchyBuilder<FsListing> {
        HierarchyBuilder::new(self.listing())
    }

    pub fn listing(&self) -> FsListing {
        FsListing::new(self.preferences.listing_order)
    }

    /// Сбросить сессионное состояние, настройки остаются.
    pub fn reset(&mut self) {
        self.current_template = None;
    }

    /// Закрытие приложения.
    pub fn teardown(mut self) -> Preferences {
        self.reset();
        info!("Application context torn down");
        self.preferences
    }
}
