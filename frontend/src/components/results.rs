use super::super::Model;
use case_workflow::ProvisionalResult;
use shared::PredictionLabel;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let Some(result) = model.workflow.result() else {
        return html! {};
    };

    let (class, icon, text) = label_display(result);
    let accuracy = result.pred_accuracy;

    html! {
        <div class={classes!("results-container", class)}>
            <div class="result-header">
                <h2>
                    <i class={classes!("fa-solid", icon)}></i>{ format!(" {}", text) }
                    <span class="analyzed-filename-display">{ format!("({})", result.temp_id) }</span>
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Accuracy:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", accuracy)}></div>
                    </div>
                    <div class="meter-value">{ format_accuracy(accuracy) }</div>
                </div>
            </div>
            { render_expiry(result) }
        </div>
    }
}

fn render_expiry(result: &ProvisionalResult) -> Html {
    match result.expires_in_seconds {
        Some(seconds) => html! {
            <p class="expiry-note">
                { format!("Unsaved results expire {}.", format_expiry(seconds)) }
            </p>
        },
        None => html! {},
    }
}

/// Labels the server sends that are not recognised are shown as received.
fn label_display(result: &ProvisionalResult) -> (&'static str, &'static str, String) {
    match result.label() {
        Some(PredictionLabel::Positive) => ("positive", "fa-triangle-exclamation", "Positive".to_string()),
        Some(PredictionLabel::Negative) => ("negative", "fa-circle-check", "Negative".to_string()),
        None => ("unclassified", "fa-circle-question", result.pred_label.clone()),
    }
}

fn format_accuracy(accuracy: f64) -> String {
    format!("{:.1}%", accuracy)
}

fn format_expiry(seconds: u64) -> String {
    match seconds {
        0 => "now".to_string(),
        s if s < 60 => format!("in {} s", s),
        s if s % 60 == 0 => format!("in {} min", s / 60),
        s => format!("in {} min {} s", s / 60, s % 60),
    }
}
