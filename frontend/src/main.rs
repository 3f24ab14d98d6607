mod api;
mod components;
mod session;

use api::HttpCaseApi;
use case_workflow::{CaseWorkflow, CommitCompletion, ProcessCompletion, ProcessedCase, SourceImage};
use components::handlers;
use components::utils::ReadSequence;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::Session;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Analysis,
}

#[derive(Default)]
pub struct LoginForm {
    pub student_id: String,
    pub pending: bool,
    pub error: Option<String>,
}

// Yew msg components
pub enum Msg {
    // Session
    LoginInput(String),
    LoginSubmit,
    LoginFinished(Result<Session, String>),
    Logout,
    OpenAnalysis,

    // Image selection
    FileChosen(GlooFile),
    ImageLoaded(u64, Result<(SourceImage, ObjectUrl), String>),
    SetError(Option<String>),
    SetDragging(bool),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),

    // Case workflow
    Process,
    ProcessFinished(ProcessCompletion<ProcessedCase<ObjectUrl>>),
    NotesChanged(String),
    Save,
    SaveFinished(CommitCompletion),

    // Leave dialog
    OpenLeave,
    CloseLeave,
    ConfirmLeave,
}

// Main component
pub struct Model {
    pub session: Session,
    pub page: Page,
    pub api: Rc<HttpCaseApi>,
    pub workflow: CaseWorkflow<ObjectUrl>,
    pub login: LoginForm,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub is_dragging: bool,
    pub reads: ReadSequence,
    pub leave_dialog_open: bool,
    paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            session: session::load(),
            page: Page::Home,
            api: Rc::new(HttpCaseApi::new(api::api_config())),
            workflow: CaseWorkflow::new(),
            login: LoginForm::default(),
            error: None,
            notice: None,
            is_dragging: false,
            reads: ReadSequence::default(),
            leave_dialog_open: false,
            paste_listener: None,
        };

        let link = ctx.link().clone();
        if let Some(window) = web_sys::window() {
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Session
            Msg::LoginInput(value) => {
                self.login.student_id = value;
                self.login.error = None;
                true
            }
            Msg::LoginSubmit => handlers::handle_login_submit(self, ctx),
            Msg::LoginFinished(result) => handlers::handle_login_finished(self, result),
            Msg::Logout => handlers::handle_logout(self),
            Msg::OpenAnalysis => handlers::handle_open_analysis(self),

            // Image selection
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::ImageLoaded(read_id, loaded) => handlers::handle_image_loaded(self, read_id, loaded),
            Msg::SetError(error) => {
                self.error = error;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),

            // Case workflow
            Msg::Process => handlers::handle_process(self, ctx),
            Msg::ProcessFinished(completion) => handlers::handle_process_finished(self, completion),
            Msg::NotesChanged(notes) => handlers::handle_notes_changed(self, notes),
            Msg::Save => handlers::handle_save(self, ctx),
            Msg::SaveFinished(completion) => handlers::handle_save_finished(self, completion),

            // Leave dialog
            Msg::OpenLeave => {
                self.leave_dialog_open = true;
                true
            }
            Msg::CloseLeave => {
                self.leave_dialog_open = false;
                true
            }
            Msg::ConfirmLeave => handlers::handle_confirm_leave(self),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header(self, ctx) }

                <main class="main-content">
                {
                    match self.page {
                        Page::Home => components::home::render_home(self, ctx),
                        Page::Analysis => html! {
                            <>
                                { components::upload_section::render_upload_section(self, ctx) }
                                { components::utils::render_error_message(self) }
                                { components::preview_area::render_preview_area(self) }
                                { components::results::render_results(self) }
                                { components::notes::render_notes(self, ctx) }
                                { components::leave_dialog::render_leave_dialog(self, ctx) }
                            </>
                        },
                    }
                }
                </main>

                <footer class="app-footer">
                    <p>{"HaHAI | Hand X-ray triage"}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        handlers::handle_teardown(self);
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
