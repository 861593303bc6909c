use checkout_widgets::application::payment_form::{PaymentFormWidget, SubmitOutcome};
use checkout_widgets::application::timer::TimerWidget;
use checkout_widgets::domain::form::Field;
use checkout_widgets::infrastructure::scheduler::IntervalScheduler;
use checkout_widgets::infrastructure::stub_gateway::StubGateway;
use checkout_widgets::infrastructure::template_renderer::TemplateRenderer;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type the given values into the payment form and submit it.
    Payment {
        #[arg(long, default_value = "")]
        card: String,
        #[arg(long, default_value = "")]
        holder: String,
        #[arg(long, default_value = "")]
        month: String,
        #[arg(long, default_value = "")]
        year: String,
        #[arg(long, default_value = "")]
        cvv: String,
        /// Stub gateway delay in milliseconds.
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
    /// Run the stopwatch for a number of ticks, then reset it.
    Timer {
        #[arg(long, default_value_t = 3)]
        seconds: u64,
        /// Demo pacing in milliseconds per tick.
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Payment {
            card,
            holder,
            month,
            year,
            cvv,
            delay_ms,
        } => run_payment(&card, &holder, &month, &year, &cvv, delay_ms).await,
        Command::Timer { seconds, tick_ms } => run_timer(seconds, tick_ms).await,
    }
}

async fn run_payment(
    card: &str,
    holder: &str,
    month: &str,
    year: &str,
    cvv: &str,
    delay_ms: u64,
) -> Result<()> {
    let gateway = Box::new(StubGateway::with_delay(Duration::from_millis(delay_ms)));
    let mut widget = PaymentFormWidget::mount(&TemplateRenderer, gateway).into_diagnostic()?;

    type_value(&mut widget, Field::CardNumber, card).into_diagnostic()?;
    type_value(&mut widget, Field::CardHolder, holder).into_diagnostic()?;
    type_value(&mut widget, Field::Cvv, cvv).into_diagnostic()?;
    widget
        .input(Field::ExpirationMonth, month)
        .into_diagnostic()?;
    widget.input(Field::ExpirationYear, year).into_diagnostic()?;

    println!(
        "card number: {}",
        widget
            .scope()
            .value(Field::CardNumber.input_id())
            .into_diagnostic()?
    );

    match widget.submit().await.into_diagnostic()? {
        SubmitOutcome::Started(_) => {
            if let Some(receipt) = widget.receipt() {
                println!("{}", widget.success_message().into_diagnostic()?);
                println!(
                    "receipt: {}",
                    serde_json::to_string(receipt).into_diagnostic()?
                );
            } else {
                eprintln!("Payment processing failed");
            }
        }
        SubmitOutcome::Rejected(rejection) => {
            eprintln!("payment not submitted: {}", rejection.message);
        }
        SubmitOutcome::Ignored => {}
    }
    Ok(())
}

async fn run_timer(seconds: u64, tick_ms: u64) -> Result<()> {
    let scheduler = Box::new(IntervalScheduler::with_period(Duration::from_millis(
        tick_ms,
    )));
    let mut widget = TimerWidget::mount(&TemplateRenderer, scheduler).into_diagnostic()?;

    widget.start();
    for _ in 0..seconds {
        if !widget.next_tick().await.into_diagnostic()? {
            break;
        }
        println!("{}", widget.display().into_diagnostic()?);
    }

    widget.reset().into_diagnostic()?;
    println!("reset: {}", widget.display().into_diagnostic()?);
    Ok(())
}

/// Feeds `text` into `field` one keystroke at a time, mirroring the
/// displayed value between keystrokes the way a live input element does.
fn type_value(
    widget: &mut PaymentFormWidget,
    field: Field,
    text: &str,
) -> checkout_widgets::error::Result<()> {
    let mut buffer = String::new();
    for ch in text.chars() {
        buffer.push(ch);
        widget.input(field, &buffer)?;
        buffer = widget.scope().value(field.input_id())?.to_string();
    }
    Ok(())
}
