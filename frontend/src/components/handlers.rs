use super::super::{Model, Msg, Page};
use super::utils::first_image_file;
use crate::api::{self, HttpCaseApi};
use crate::session;
use case_workflow::{
    CaseWorkflow, CommitCompletion, DiscardTemp, Followup, ProcessCompletion, ProcessedCase,
    SourceImage, discard_best_effort, run_commit, run_process,
};
use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use shared::Session;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

const GRADCAM_MEDIA_TYPE: &str = "image/png";

fn fire_discard(api: &Rc<HttpCaseApi>, discard: DiscardTemp) {
    let api = Rc::clone(api);
    spawn_local(async move {
        discard_best_effort(api.as_ref(), discard).await;
    });
}

fn apply_followup(model: &mut Model, followup: Followup) -> bool {
    if let Some(discard) = followup.discard {
        fire_discard(&model.api, discard);
    }
    if followup.leave {
        leave_workflow(model);
    }
    true
}

fn leave_workflow(model: &mut Model) {
    model.leave_dialog_open = false;
    if !model.workflow.state().is_terminal() {
        return;
    }
    model.notice = model
        .workflow
        .record()
        .map(|record| format!("Case {} saved.", record.case_id));
    model.workflow = CaseWorkflow::new();
    model.error = None;
    model.page = Page::Home;
}

// Session

pub fn handle_login_submit(model: &mut Model, ctx: &Context<Model>) -> bool {
    let student_id = model.login.student_id.trim().to_string();
    if student_id.is_empty() || model.login.pending {
        return false;
    }
    model.login.pending = true;
    model.login.error = None;

    let config = model.api.config().clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = api::login_intern(&config, &student_id)
            .await
            .map_err(|e| {
                log::error!("Intern login failed: {}", e);
                format!("Login failed: {}", e)
            });
        link.send_message(Msg::LoginFinished(result));
    });
    true
}

pub fn handle_login_finished(model: &mut Model, result: Result<Session, String>) -> bool {
    model.login.pending = false;
    match result {
        Ok(new_session) => {
            log::info!("Signed in as {:?}", new_session.student_id);
            session::store(&new_session);
            model.session = new_session;
            model.login = Default::default();
            model.page = Page::Analysis;
        }
        Err(message) => model.login.error = Some(message),
    }
    true
}

pub fn handle_logout(model: &mut Model) -> bool {
    if let Ok(followup) = model.workflow.abandon() {
        let _ = apply_followup(model, followup);
    }
    session::clear();
    model.session = Session::signed_out();
    model.page = Page::Home;
    model.notice = None;
    true
}

pub fn handle_open_analysis(model: &mut Model) -> bool {
    if model.session.intern_credential().is_none() {
        model.error = Some("Sign in as an intern to analyse images.".into());
        return true;
    }
    if model.workflow.leave_pending() {
        model.notice = Some("The previous case is still closing, try again in a moment.".into());
        return true;
    }
    if model.workflow.state().is_terminal() {
        model.workflow = CaseWorkflow::new();
    }
    model.notice = None;
    model.error = None;
    model.page = Page::Analysis;
    true
}

// Image selection

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    // any earlier read still running is now stale
    let read_id = model.reads.start();
    let media_type = file.raw_mime_type();
    if !media_type.starts_with("image/") {
        log::warn!("Skipping non-image file: {}", file.name());
        model.error = Some(format!("Skipped non-image file: {}", file.name()));
        return true;
    }

    let link = ctx.link().clone();
    spawn_local(async move {
        let read = gloo_file::futures::read_as_bytes(&file).await;
        let loaded = match read {
            Ok(bytes) => {
                let image = SourceImage::new(file.name(), media_type, bytes);
                Ok((image, ObjectUrl::from(file)))
            }
            Err(e) => Err(format!("Could not read {}: {}", file.name(), e)),
        };
        link.send_message(Msg::ImageLoaded(read_id, loaded));
    });
    false
}

pub fn handle_image_loaded(
    model: &mut Model,
    read_id: u64,
    loaded: Result<(SourceImage, ObjectUrl), String>,
) -> bool {
    if !model.reads.is_latest(read_id) {
        log::debug!("Dropping superseded file read {}", read_id);
        return false;
    }
    let (image, preview) = match loaded {
        Ok(loaded) => loaded,
        Err(message) => {
            model.error = Some(message);
            return true;
        }
    };
    if let Ok(discard) = model.workflow.select_image(image, preview) {
        model.error = None;
        if let Some(discard) = discard {
            fire_discard(&model.api, discard);
        }
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file_list) = event.data_transfer().and_then(|transfer| transfer.files()) {
        choose_from_list(ctx, &file_list);
    }
    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if model.page != Page::Analysis {
        return false;
    }
    if let Some(file_list) = event.clipboard_data().and_then(|data| data.files()) {
        if file_list.length() > 0 {
            event.prevent_default();
            choose_from_list(ctx, &file_list);
            return true;
        }
    }
    false
}

fn choose_from_list(ctx: &Context<Model>, file_list: &FileList) {
    match first_image_file(file_list) {
        Ok(file) => ctx.link().send_message(Msg::FileChosen(file)),
        Err(message) => ctx.link().send_message(Msg::SetError(Some(message))),
    }
}

// Case workflow

pub fn handle_process(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Ok(ticket) = model.workflow.begin_process(&model.session) else {
        return true;
    };

    let api = Rc::clone(&model.api);
    let link = ctx.link().clone();
    spawn_local(async move {
        let completion = run_process(api.as_ref(), ticket).await;
        let completion = completion.map(|analysis| ProcessedCase {
            preview: ObjectUrl::from(Blob::new_with_options(
                analysis.artifact.as_slice(),
                Some(GRADCAM_MEDIA_TYPE),
            )),
            result: analysis.result,
        });
        link.send_message(Msg::ProcessFinished(completion));
    });
    true
}

pub fn handle_process_finished(model: &mut Model, completion: ProcessCompletion<ProcessedCase<ObjectUrl>>) -> bool {
    match model.workflow.finish_process(completion) {
        Ok(followup) => apply_followup(model, followup),
        Err(_) => true,
    }
}

pub fn handle_notes_changed(model: &mut Model, notes: String) -> bool {
    model.workflow.set_notes(notes).is_ok()
}

pub fn handle_save(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Ok(ticket) = model.workflow.begin_commit(&model.session) else {
        return true;
    };

    let api = Rc::clone(&model.api);
    let link = ctx.link().clone();
    spawn_local(async move {
        let completion = run_commit(api.as_ref(), ticket).await;
        link.send_message(Msg::SaveFinished(completion));
    });
    true
}

pub fn handle_save_finished(model: &mut Model, completion: CommitCompletion) -> bool {
    match model.workflow.finish_commit(completion) {
        Ok(followup) => apply_followup(model, followup),
        Err(_) => true,
    }
}

// Leave dialog

pub fn handle_confirm_leave(model: &mut Model) -> bool {
    model.leave_dialog_open = false;
    match model.workflow.abandon() {
        Ok(followup) => apply_followup(model, followup),
        Err(_) => {
            leave_workflow(model);
            true
        }
    }
}

/// Component is going away; whatever is still held is released now.
pub fn handle_teardown(model: &mut Model) {
    if let Ok(followup) = model.workflow.abandon() {
        if let Some(discard) = followup.discard {
            fire_discard(&model.api, discard);
        }
    }
}
