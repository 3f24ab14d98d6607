use super::super::{Model, Msg};
use super::utils::render_error_message;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_home(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="home">
            {
                if let Some(notice) = &model.notice {
                    html! { <p class="notice">{ notice }</p> }
                } else {
                    html! {}
                }
            }
            {
                if model.session.is_signed_in() {
                    html! {
                        <p class="subtitle">
                            {"Platform for learning and detecting hand conditions with AI."}
                        </p>
                    }
                } else {
                    render_login_form(model, ctx)
                }
            }
            { render_error_message(model) }
        </div>
    }
}

fn render_login_form(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let on_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::LoginInput(input.value())
    });
    let on_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::LoginSubmit
    });
    let can_submit = !model.login.pending && !model.login.student_id.trim().is_empty();

    html! {
        <form class="login-form" onsubmit={on_submit}>
            <h2>{"Sign in"}</h2>
            <label for="student-id">{"Student index number"}</label>
            <input
                id="student-id"
                type="text"
                autocomplete="off"
                value={model.login.student_id.clone()}
                oninput={on_input}
                disabled={model.login.pending}
            />
            {
                if let Some(error) = &model.login.error {
                    html! { <p class="error-message">{ error }</p> }
                } else {
                    html! {}
                }
            }
            <button type="submit" class="login-button" disabled={!can_submit}>
                {
                    if model.login.pending {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Signing in..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-right-to-bracket"></i>{" Continue"}</> }
                    }
                }
            </button>
        </form>
    }
}
