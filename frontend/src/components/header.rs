use super::super::{Model, Msg, Page};
use yew::prelude::*;

/// Renders the application header with the signed-in user and navigation
pub fn render_header(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-hand"></i> {" HaHAI"}</h1>
            <p class="subtitle">{"Hand X-ray analysis for interns"}</p>
            {
                if let Some(student_id) = &model.session.student_id {
                    html! {
                        <div class="user-info">
                            <span class="user-name">{ student_id }</span>
                            {
                                if model.page == Page::Home {
                                    html! {
                                        <button class="analyze-btn" onclick={link.callback(|_| Msg::OpenAnalysis)}>
                                            <i class="fa-solid fa-x-ray"></i>{" Analysis"}
                                        </button>
                                    }
                                } else {
                                    html! {}
                                }
                            }
                            <button class="logout-button" onclick={link.callback(|_| Msg::Logout)} title="Logout">
                                <i class="fa-solid fa-sign-out-alt"></i>{" Logout"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </header>
    }
}
