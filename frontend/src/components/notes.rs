use super::super::{Model, Msg};
use super::utils::debounce;
use case_workflow::WorkflowState;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

/// Notes field and the save / leave controls for the current case.
pub fn render_notes(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let state = model.workflow.state();
    let editable = model.workflow.can_edit_notes();

    let on_input = link.callback(|e: InputEvent| {
        let area: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::NotesChanged(area.value())
    });

    html! {
        <div class="notes-section">
            <label for="case-notes">{"Notes"}</label>
            <textarea
                id="case-notes"
                rows="4"
                placeholder="Observations for this case"
                value={model.workflow.notes().to_string()}
                oninput={on_input}
                disabled={!editable}
            />
            {
                if model.workflow.leave_pending() {
                    html! { <p class="notice">{"Leaving after the current request finishes..."}</p> }
                } else {
                    html! {}
                }
            }
            <div class="button-container">
                <button
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={link.callback(|_| Msg::OpenLeave)}
                    disabled={model.workflow.leave_pending()}
                >
                    <i class="fa-solid fa-arrow-left"></i>{" Leave"}
                </button>
                <button
                    class="analyze-btn"
                    style="background-color: var(--primary-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Save)
                    })}
                    disabled={!model.workflow.can_commit()}
                >
                    {
                        if state == WorkflowState::Committing {
                            html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Saving..."}</> }
                        } else {
                            html! { <><i class="fa-solid fa-floppy-disk"></i>{" Save"}</> }
                        }
                    }
                </button>
            </div>
        </div>
    }
}
