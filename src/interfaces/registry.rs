use crate::application::payment_form::{self, PaymentFormWidget};
use crate::application::timer::{self, TimerWidget};
use crate::domain::ports::Renderer;
use crate::domain::scope::Scope;
use crate::error::{Result, WidgetError};
use crate::infrastructure::scheduler::IntervalScheduler;
use crate::infrastructure::stub_gateway::StubGateway;
use std::collections::HashMap;

/// A widget constructed through the registry.
pub enum Widget {
    PaymentForm(PaymentFormWidget),
    Timer(TimerWidget),
}

impl Widget {
    pub fn scope(&self) -> &Scope {
        match self {
            Widget::PaymentForm(widget) => widget.scope(),
            Widget::Timer(widget) => widget.scope(),
        }
    }
}

/// Constructs a widget instance against the host's renderer.
pub type WidgetFactory = Box<dyn Fn(&dyn Renderer) -> Result<Widget> + Send + Sync>;

/// Maps tag names to widget factories.
///
/// There is a single authoritative definition per tag name: registering
/// a tag twice is rejected instead of silently replacing the earlier
/// definition.
#[derive(Default)]
pub struct WidgetRegistry {
    factories: HashMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in widgets: `payment-card` backed by the
    /// stub gateway and `timer` backed by the tokio interval scheduler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            payment_form::TAG.to_string(),
            Box::new(|renderer| {
                let gateway = Box::new(StubGateway::new());
                Ok(Widget::PaymentForm(PaymentFormWidget::mount(
                    renderer, gateway,
                )?))
            }),
        );
        registry.factories.insert(
            timer::TAG.to_string(),
            Box::new(|renderer| {
                let scheduler = Box::new(IntervalScheduler::new());
                Ok(Widget::Timer(TimerWidget::mount(renderer, scheduler)?))
            }),
        );
        registry
    }

    pub fn register(&mut self, tag: &str, factory: WidgetFactory) -> Result<()> {
        if self.factories.contains_key(tag) {
            return Err(WidgetError::DuplicateTag(tag.to_string()));
        }
        self.factories.insert(tag.to_string(), factory);
        Ok(())
    }

    pub fn instantiate(&self, tag: &str, renderer: &dyn Renderer) -> Result<Widget> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| WidgetError::UnknownTag(tag.to_string()))?;
        factory(renderer)
    }

    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
