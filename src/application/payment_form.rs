use crate::domain::form::{
    Field, FieldRejection, FormFieldState, PaymentFormSnapshot, PaymentFormState, Receipt,
    SubmissionState,
};
use crate::domain::ports::{PaymentGatewayBox, Renderer};
use crate::domain::scope::Scope;
use crate::error::Result;
use tracing::{debug, warn};

/// Tag name the payment form registers under.
pub const TAG: &str = "payment-card";

const SUCCESS_MODAL_ID: &str = "success-modal";
const SUCCESS_MESSAGE_ID: &str = "success-message";
const FAILURE_ALERT_ID: &str = "failure-alert";

const TEMPLATE: &str = r#"
<div class="payment-form">
    <form id="payment-form">
        <div class="form-group">
            <label for="card-number">Card number</label>
            <input type="text" id="card-number" placeholder="&#8226;&#8226;&#8226;&#8226; &#8226;&#8226;&#8226;&#8226; &#8226;&#8226;&#8226;&#8226; &#8226;&#8226;&#8226;&#8226;">
            <div id="card-number-error" class="error-message"></div>
        </div>
        <div class="form-group">
            <label for="card-holder">Card holder</label>
            <input type="text" id="card-holder" placeholder="Full name">
            <div id="card-holder-error" class="error-message"></div>
        </div>
        <div class="form-group">
            <label for="expiration-month">Month</label>
            <select id="expiration-month"></select>
            <div id="expiration-month-error" class="error-message"></div>
        </div>
        <div class="form-group">
            <label for="expiration-year">Year</label>
            <select id="expiration-year"></select>
            <div id="expiration-year-error" class="error-message"></div>
        </div>
        <div class="form-group">
            <label for="cvv">CVV</label>
            <input type="text" id="cvv" maxlength="3" placeholder="&#8226;&#8226;&#8226;">
            <div id="cvv-error" class="error-message"></div>
        </div>
        <button type="submit" id="submit">Pay</button>
    </form>
    <div class="modal-overlay" id="success-modal">
        <div class="modal-content" id="success-message">Payment completed successfully.</div>
    </div>
    <div class="alert" id="failure-alert">Payment processing failed</div>
</div>
"#;

const STYLESHEET: &str = r#"
.payment-form {
    max-width: 400px;
    margin: 20px auto;
    padding: 20px;
    border-radius: 8px;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    font-family: Arial, sans-serif;
}
.form-group { margin-bottom: 15px; }
label { display: block; margin-bottom: 5px; color: #333; }
input, select {
    width: 100%;
    padding: 8px;
    border: 1px solid #ddd;
    border-radius: 4px;
    box-sizing: border-box;
}
input.invalid, select.invalid { border-color: #ff0000; }
button {
    width: 100%;
    padding: 10px;
    background-color: #007bff;
    color: white;
    border: none;
    border-radius: 4px;
    cursor: pointer;
}
button:hover { background-color: #0056b3; }
.modal-overlay {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    background-color: rgba(0,0,0,0.5);
    justify-content: center;
    align-items: center;
}
.modal-content {
    background-color: white;
    padding: 20px;
    border-radius: 8px;
    max-width: 300px;
    text-align: center;
}
.alert { color: #ff0000; text-align: center; margin-top: 10px; }
.error-message { color: #ff0000; font-size: 14px; margin-top: 5px; }
"#;

/// Outcome of a submit trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; the trigger was discarded.
    Ignored,
    /// The validation pass failed; the gateway was not called.
    Rejected(FieldRejection),
    /// The snapshot was handed to the gateway.
    Started(PaymentFormSnapshot),
}

/// The payment-entry form widget.
///
/// Owns its rendered scope, the per-field validation state, and the
/// one-shot submission flow. Input handling is synchronous; the gateway
/// call is the only suspension point, and submit triggers arriving while
/// a submission is in flight are discarded.
pub struct PaymentFormWidget {
    scope: Scope,
    state: PaymentFormState,
    submission: SubmissionState,
    gateway: PaymentGatewayBox,
    receipt: Option<Receipt>,
    detached: bool,
}

impl PaymentFormWidget {
    /// Renders the form template into a fresh scope and binds the widget
    /// to it.
    pub fn mount(renderer: &dyn Renderer, gateway: PaymentGatewayBox) -> Result<Self> {
        let mut scope = renderer.mount(TEMPLATE, STYLESHEET)?;
        scope.hide(SUCCESS_MODAL_ID)?;
        scope.hide(FAILURE_ALERT_ID)?;
        Ok(Self {
            scope,
            state: PaymentFormState::new(),
            submission: SubmissionState::Idle,
            gateway,
            receipt: None,
            detached: false,
        })
    }

    /// Handles one keystroke in `field`: sanitize, write the displayed
    /// value back, re-validate, and update the inline error state. All of
    /// this completes before the call returns, so the scope never shows
    /// stale validation state.
    pub fn input(&mut self, field: Field, raw: &str) -> Result<()> {
        self.ensure_attached();
        let value = self.state.apply_input(field, raw).raw_value.clone();
        self.scope.set_value(field.input_id(), &value)?;
        self.render_field(field)
    }

    /// Applies a submit trigger to the submission state machine.
    ///
    /// Ignored while a submission is in flight. A trigger arriving after
    /// a finished attempt starts a fresh one from `Idle`. On a failing
    /// validation pass the first rejected field is surfaced and the state
    /// stays `Idle`; otherwise the widget moves to `InFlight` and yields
    /// the snapshot to hand to the gateway.
    pub fn request_submit(&mut self) -> Result<SubmitOutcome> {
        self.ensure_attached();
        match self.submission {
            SubmissionState::InFlight => {
                warn!("submit trigger discarded: submission in flight");
                return Ok(SubmitOutcome::Ignored);
            }
            SubmissionState::Succeeded | SubmissionState::Failed => {
                self.submission = SubmissionState::Idle;
                self.scope.hide(SUCCESS_MODAL_ID)?;
                self.scope.hide(FAILURE_ALERT_ID)?;
            }
            SubmissionState::Idle => {}
        }

        match self.state.validate() {
            Err(rejection) => {
                debug!(field = ?rejection.field, "submit rejected by validation");
                self.scope
                    .set_text(rejection.field.error_id(), rejection.message)?;
                self.scope.add_class(rejection.field.input_id(), "invalid")?;
                Ok(SubmitOutcome::Rejected(rejection))
            }
            Ok(snapshot) => {
                self.submission = SubmissionState::InFlight;
                debug!("submission started");
                Ok(SubmitOutcome::Started(snapshot))
            }
        }
    }

    /// Applies the gateway outcome to an in-flight submission.
    ///
    /// Success shows the in-scope confirmation modal; failure shows the
    /// generic failure alert. Neither resets the state automatically.
    pub fn resolve(&mut self, outcome: Result<Receipt>) -> Result<()> {
        self.ensure_attached();
        assert!(
            self.submission == SubmissionState::InFlight,
            "gateway resolution without an in-flight submission"
        );
        match outcome {
            Ok(receipt) => {
                self.submission = SubmissionState::Succeeded;
                self.scope.show(SUCCESS_MODAL_ID)?;
                debug!(reference = %receipt.reference, "submission succeeded");
                self.receipt = Some(receipt);
            }
            Err(err) => {
                self.submission = SubmissionState::Failed;
                self.scope.show(FAILURE_ALERT_ID)?;
                warn!(%err, "submission failed");
            }
        }
        Ok(())
    }

    /// The full submit flow: trigger, gateway call, resolution.
    ///
    /// There is no cancellation; once started the submission runs to
    /// completion before another can begin.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        match self.request_submit()? {
            SubmitOutcome::Started(snapshot) => {
                let outcome = self.gateway.submit(&snapshot).await;
                self.resolve(outcome)?;
                Ok(SubmitOutcome::Started(snapshot))
            }
            other => Ok(other),
        }
    }

    pub fn field_state(&self, field: Field) -> &FormFieldState {
        self.state.field(field)
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    /// Receipt of the most recent successful submission, if any.
    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn success_message(&self) -> Result<&str> {
        self.scope.text(SUCCESS_MESSAGE_ID)
    }

    pub fn is_success_modal_visible(&self) -> Result<bool> {
        self.scope.is_visible(SUCCESS_MODAL_ID)
    }

    pub fn is_failure_alert_visible(&self) -> Result<bool> {
        self.scope.is_visible(FAILURE_ALERT_ID)
    }

    /// Detaches the widget from its scope. Driving a detached widget is a
    /// programming error and panics.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    fn render_field(&mut self, field: Field) -> Result<()> {
        let state = self.state.field(field).clone();
        self.scope.set_text(field.error_id(), &state.error_text)?;
        if state.is_valid {
            self.scope.remove_class(field.input_id(), "invalid")
        } else {
            self.scope.add_class(field.input_id(), "invalid")
        }
    }

    fn ensure_attached(&self) {
        assert!(!self.detached, "payment form widget used after detach");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validators::CVV_MESSAGE;
    use crate::error::WidgetError;
    use crate::infrastructure::stub_gateway::{FailingGateway, StubGateway};
    use crate::infrastructure::template_renderer::TemplateRenderer;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingGateway {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl crate::domain::ports::PaymentGateway for CountingGateway {
        async fn submit(&self, _snapshot: &PaymentFormSnapshot) -> Result<Receipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Receipt {
                reference: "counted".to_string(),
            })
        }
    }

    fn mount_with(gateway: PaymentGatewayBox) -> PaymentFormWidget {
        PaymentFormWidget::mount(&TemplateRenderer, gateway).unwrap()
    }

    fn fill_valid(widget: &mut PaymentFormWidget) {
        widget.input(Field::CardNumber, "4111111111111111").unwrap();
        widget.input(Field::CardHolder, "John Smith").unwrap();
        widget.input(Field::Cvv, "123").unwrap();
        widget.input(Field::ExpirationMonth, "05").unwrap();
        widget.input(Field::ExpirationYear, "2030").unwrap();
    }

    #[test]
    fn test_card_number_input_is_formatted_live() {
        let mut widget = mount_with(Box::new(StubGateway::new()));
        widget.input(Field::CardNumber, "4111111111111111").unwrap();

        assert_eq!(
            widget.scope().value("card-number").unwrap(),
            "4111 1111 1111 1111"
        );
        assert_eq!(widget.scope().text("card-number-error").unwrap(), "");
        assert!(!widget.scope().has_class("card-number", "invalid").unwrap());
    }

    #[test]
    fn test_short_cvv_surfaces_inline_error() {
        let mut widget = mount_with(Box::new(StubGateway::new()));
        widget.input(Field::Cvv, "12").unwrap();

        assert_eq!(widget.scope().text("cvv-error").unwrap(), CVV_MESSAGE);
        assert!(widget.scope().has_class("cvv", "invalid").unwrap());

        widget.input(Field::Cvv, "123").unwrap();
        assert_eq!(widget.scope().text("cvv-error").unwrap(), "");
        assert!(!widget.scope().has_class("cvv", "invalid").unwrap());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_gateway() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut widget = mount_with(Box::new(CountingGateway {
            calls: calls.clone(),
        }));
        fill_valid(&mut widget);
        widget.input(Field::Cvv, "12").unwrap();

        let outcome = widget.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected(r) if r.field == Field::Cvv));
        assert_eq!(widget.submission_state(), SubmissionState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(widget.scope().text("cvv-error").unwrap(), CVV_MESSAGE);
    }

    #[tokio::test]
    async fn test_valid_submission_succeeds() {
        let mut widget = mount_with(Box::new(StubGateway::with_delay(Duration::from_millis(1))));
        fill_valid(&mut widget);

        assert!(!widget.is_success_modal_visible().unwrap());
        let outcome = widget.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Started(_)));
        assert_eq!(widget.submission_state(), SubmissionState::Succeeded);
        assert!(widget.is_success_modal_visible().unwrap());
        assert!(widget.receipt().is_some());
    }

    #[tokio::test]
    async fn test_gateway_failure_surfaces_generic_alert() {
        let mut widget = mount_with(Box::new(FailingGateway));
        fill_valid(&mut widget);

        widget.submit().await.unwrap();
        assert_eq!(widget.submission_state(), SubmissionState::Failed);
        assert!(widget.is_failure_alert_visible().unwrap());
        assert!(!widget.is_success_modal_visible().unwrap());
        assert!(widget.receipt().is_none());
    }

    #[test]
    fn test_second_trigger_while_in_flight_is_ignored() {
        let mut widget = mount_with(Box::new(StubGateway::new()));
        fill_valid(&mut widget);

        let first = widget.request_submit().unwrap();
        assert!(matches!(first, SubmitOutcome::Started(_)));
        assert_eq!(widget.submission_state(), SubmissionState::InFlight);

        let second = widget.request_submit().unwrap();
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(widget.submission_state(), SubmissionState::InFlight);

        widget
            .resolve(Ok(Receipt {
                reference: "r-1".to_string(),
            }))
            .unwrap();
        assert_eq!(widget.submission_state(), SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn test_fresh_submit_after_failure_starts_over() {
        let mut widget = mount_with(Box::new(StubGateway::with_delay(Duration::from_millis(1))));
        fill_valid(&mut widget);

        let started = widget.request_submit().unwrap();
        assert!(matches!(started, SubmitOutcome::Started(_)));
        widget
            .resolve(Err(WidgetError::Gateway("declined".to_string())))
            .unwrap();
        assert_eq!(widget.submission_state(), SubmissionState::Failed);
        assert!(widget.is_failure_alert_visible().unwrap());

        let outcome = widget.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Started(_)));
        assert_eq!(widget.submission_state(), SubmissionState::Succeeded);
        assert!(!widget.is_failure_alert_visible().unwrap());
        assert!(widget.is_success_modal_visible().unwrap());
    }

    #[test]
    #[should_panic(expected = "used after detach")]
    fn test_detached_widget_panics_on_input() {
        let mut widget = mount_with(Box::new(StubGateway::new()));
        widget.detach();
        let _ = widget.input(Field::Cvv, "123");
    }

    #[test]
    #[should_panic(expected = "without an in-flight submission")]
    fn test_resolution_without_in_flight_submission_panics() {
        let mut widget = mount_with(Box::new(StubGateway::new()));
        let _ = widget.resolve(Ok(Receipt {
            reference: "r-1".to_string(),
        }));
    }
}
