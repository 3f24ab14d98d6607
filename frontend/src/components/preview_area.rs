use super::super::Model;
use case_workflow::WorkflowState;
use yew::prelude::*;

pub fn render_preview_area(model: &Model) -> Html {
    let Some(image) = model.workflow.image() else {
        return html! {
            <div class="select-preview">
                <p>{"Select a hand X-ray to start"}</p>
            </div>
        };
    };

    html! {
        <div id="preview-container">
            <div class="preview-pair">
                <figure class="preview-item">
                    {
                        if let Some(url) = model.workflow.image_preview() {
                            html! { <img id="actual-image-preview" src={url.to_string()} alt={image.name().to_string()} /> }
                        } else {
                            html! { <div class="unavailable-preview"><p>{"Preview unavailable"}</p></div> }
                        }
                    }
                    <figcaption>{ format!("Original: {}", image.name()) }</figcaption>
                </figure>
                <figure class="preview-item">
                    { render_gradcam(model) }
                    <figcaption>{"Grad-CAM"}</figcaption>
                </figure>
            </div>
        </div>
    }
}

fn render_gradcam(model: &Model) -> Html {
    match (model.workflow.state(), model.workflow.result_preview()) {
        (WorkflowState::Processing, _) => html! {
            <div class="loading-preview">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p style="margin-left: 10px;">{"Processing..."}</p>
            </div>
        },
        (_, Some(url)) => html! { <img id="gradcam-preview" src={url.to_string()} alt="Grad-CAM heatmap" /> },
        _ => html! {
            <div class="preview-placeholder preview-placeholder-centered">{"Not processed yet"}</div>
        },
    }
}
