use checkout_widgets::application::payment_form::PaymentFormWidget;
use checkout_widgets::domain::form::Field;
use checkout_widgets::domain::ports::PaymentGatewayBox;
use checkout_widgets::infrastructure::template_renderer::TemplateRenderer;

pub fn mount_form(gateway: PaymentGatewayBox) -> PaymentFormWidget {
    PaymentFormWidget::mount(&TemplateRenderer, gateway).unwrap()
}

/// Types `text` into `field` one keystroke at a time, mirroring the
/// displayed value between keystrokes like a live input element.
pub fn type_value(widget: &mut PaymentFormWidget, field: Field, text: &str) {
    let mut buffer = String::new();
    for ch in text.chars() {
        buffer.push(ch);
        widget.input(field, &buffer).unwrap();
        buffer = widget.scope().value(field.input_id()).unwrap().to_string();
    }
}

pub fn fill_valid_form(widget: &mut PaymentFormWidget) {
    type_value(widget, Field::CardNumber, "4111111111111111");
    type_value(widget, Field::CardHolder, "John Smith");
    type_value(widget, Field::Cvv, "123");
    widget.input(Field::ExpirationMonth, "05").unwrap();
    widget.input(Field::ExpirationYear, "2030").unwrap();
}
