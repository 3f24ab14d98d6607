use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_leave_dialog(model: &Model, ctx: &Context<Model>) -> Html {
    if !model.leave_dialog_open {
        return html! {};
    }
    let link = ctx.link();
    let message = if model.workflow.result().is_some() {
        "The unsaved result will be discarded. Leave this case?"
    } else {
        "Leave this case?"
    };

    html! {
        <div class="dialog-backdrop">
            <div class="dialog" role="dialog" aria-modal="true">
                <p>{ message }</p>
                <div class="button-container">
                    <button class="analyze-btn" onclick={link.callback(|_| Msg::CloseLeave)}>
                        {"Stay"}
                    </button>
                    <button
                        class="analyze-btn"
                        style="background-color: var(--clear-color);"
                        onclick={link.callback(|_| Msg::ConfirmLeave)}
                    >
                        {"Leave"}
                    </button>
                </div>
            </div>
        </div>
    }
}
