use super::super::{Model, Msg};
use super::utils::{debounce, first_image_file};
use case_workflow::WorkflowState;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_process_controls(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let locked = matches!(model.workflow.state(), WorkflowState::Committing) || model.workflow.leave_pending();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let chosen = input.files().ok_or_else(|| "No file selected.".to_string()).and_then(|files| first_image_file(&files));

        // lets the same file be picked again
        input.set_value("");

        match chosen {
            Ok(file) => Msg::FileChosen(file),
            Err(message) => Msg::SetError(Some(message)),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"));
        if let Some(input) = input {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
                disabled={locked}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop an X-ray here, paste, or click"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP"}</p>
                </div>
            </div>
        </>
    }
}

fn render_process_controls(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();
    let processing = model.workflow.process_in_flight();

    html! {
        <div class="button-container">
            <button
                class="analyze-btn"
                onclick={debounce(300, move || link.send_message(Msg::Process))}
                disabled={!model.workflow.can_process()}
            >
                {
                    if processing {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Processing..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Process"}</> }
                    }
                }
            </button>
            {
                if processing {
                    html! { <progress class="processing-indicator"></progress> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
