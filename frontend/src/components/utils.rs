use super::super::Model;
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

/// Numbers file reads so a slow read cannot replace a later choice.
#[derive(Debug, Default)]
pub struct ReadSequence {
    latest: u64,
}

impl ReadSequence {
    pub fn start(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, read_id: u64) -> bool {
        read_id == self.latest
    }
}

/// A case is analysed one image at a time; extra files are ignored.
pub fn first_image_file(file_list: &FileList) -> Result<GlooFile, String> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| file.type_().starts_with("image/"))
        .map(GlooFile::from)
        .ok_or_else(|| "No valid image file selected.".to_string())
}

pub fn render_error_message(model: &Model) -> Html {
    let error_msg = model.error.as_deref().or(model.workflow.last_error());
    if let Some(error_msg) = error_msg {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
