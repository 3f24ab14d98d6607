use crate::error::WorkflowError;
use crate::image::SourceImage;
use crate::state::{ProvisionalResult, WorkflowState};
use log::{debug, error, info, warn};
use shared::{CommitRequest, Credential, PatientRecord, Session, TempId};
use std::sync::atomic::{AtomicU64, Ordering};

// Unique across workflow instances, so a completion that outlives its
// workflow can never match a later one.
fn next_cycle() -> u64 {
    static CYCLE_COUNTER: AtomicU64 = AtomicU64::new(1);
    CYCLE_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A server-side delete owed for a provisional result the workflow has let
/// go of. Carries the credential of the intern who created it.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "released provisional results should be discarded on the server"]
pub struct DiscardTemp {
    pub temp_id: TempId,
    pub credential: Credential,
}

/// What the caller has to do after a transition.
#[derive(Debug, Default, PartialEq)]
#[must_use]
pub struct Followup {
    pub discard: Option<DiscardTemp>,
    /// Navigate away from the workflow.
    pub leave: bool,
}

impl Followup {
    fn none() -> Self {
        Self::default()
    }

    fn leave(discard: Option<DiscardTemp>) -> Self {
        Self { discard, leave: true }
    }
}

#[derive(Debug)]
pub struct ProcessTicket {
    cycle: u64,
    image: SourceImage,
    credential: Credential,
}

impl ProcessTicket {
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

#[derive(Debug)]
pub struct ProcessCompletion<T> {
    pub ticket: ProcessTicket,
    pub outcome: Result<T, WorkflowError>,
}

impl<T> ProcessCompletion<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProcessCompletion<U> {
        ProcessCompletion {
            ticket: self.ticket,
            outcome: self.outcome.map(f),
        }
    }
}

/// A finished analysis together with its displayable Grad-CAM preview.
#[derive(Debug)]
pub struct ProcessedCase<P> {
    pub result: ProvisionalResult,
    pub preview: P,
}

#[derive(Debug)]
pub struct CommitTicket {
    request: CommitRequest,
    credential: Credential,
}

impl CommitTicket {
    pub fn request(&self) -> &CommitRequest {
        &self.request
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

#[derive(Debug)]
pub struct CommitCompletion {
    pub ticket: CommitTicket,
    pub outcome: Result<PatientRecord, WorkflowError>,
}

#[derive(Debug)]
struct Held {
    result: ProvisionalResult,
    owner: Credential,
}

/// Controller for one case submission.
///
/// `P` is the client-side preview handle (an object URL in the browser).
/// Handles are owned here and released by dropping them as soon as they
/// are superseded or the workflow ends.
///
/// Each image selection starts a new cycle. A processing completion from an
/// older cycle is never adopted; its temporary id comes back as a discard.
/// Only one analysis runs at a time, even across cycles.
#[derive(Debug)]
pub struct CaseWorkflow<P> {
    state: WorkflowState,
    cycle: u64,
    image: Option<SourceImage>,
    image_preview: Option<P>,
    held: Option<Held>,
    result_preview: Option<P>,
    notes: String,
    last_error: Option<String>,
    abandon_queued: bool,
    // cycle of the outstanding process ticket
    in_flight: Option<u64>,
    record: Option<PatientRecord>,
}

impl<P> Default for CaseWorkflow<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> CaseWorkflow<P> {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            cycle: 0,
            image: None,
            image_preview: None,
            held: None,
            result_preview: None,
            notes: String::new(),
            last_error: None,
            abandon_queued: false,
            in_flight: None,
            record: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn image_preview(&self) -> Option<&P> {
        self.image_preview.as_ref()
    }

    pub fn result(&self) -> Option<&ProvisionalResult> {
        self.held.as_ref().map(|held| &held.result)
    }

    pub fn result_preview(&self) -> Option<&P> {
        self.result_preview.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// The saved record once the workflow is committed.
    pub fn record(&self) -> Option<&PatientRecord> {
        self.record.as_ref()
    }

    pub fn can_process(&self) -> bool {
        self.state == WorkflowState::Ready && !self.abandon_queued && self.in_flight.is_none()
    }

    /// Notes stay editable until a save is under way.
    pub fn can_edit_notes(&self) -> bool {
        !self.state.is_terminal() && self.state != WorkflowState::Committing
    }

    /// An analysis request is outstanding, possibly for a superseded image.
    pub fn process_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_commit(&self) -> bool {
        self.state == WorkflowState::Resulted && !self.abandon_queued
    }

    /// Leave was requested while a call was in flight.
    pub fn leave_pending(&self) -> bool {
        self.abandon_queued
    }

    pub fn select_image(&mut self, image: SourceImage, preview: P) -> Result<Option<DiscardTemp>, WorkflowError> {
        if self.state == WorkflowState::Committing || self.state.is_terminal() || self.abandon_queued {
            return Err(self.reject("select an image"));
        }
        if self.state == WorkflowState::Processing {
            debug!("Image replaced during analysis of cycle {}", self.cycle);
        }

        self.image_preview = Some(preview);
        let discard = self.take_result();
        debug!("Selected {:?}", image);

        self.image = Some(image);
        self.cycle = next_cycle();
        self.last_error = None;
        self.state = WorkflowState::Ready;
        Ok(discard)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), WorkflowError> {
        if !self.can_edit_notes() {
            return Err(self.reject("edit notes"));
        }
        self.notes = notes.into();
        Ok(())
    }

    pub fn begin_process(&mut self, session: &Session) -> Result<ProcessTicket, WorkflowError> {
        if !self.can_process() {
            return Err(self.reject("process an image"));
        }
        let Some(credential) = session.intern_credential().cloned() else {
            return Err(self.report(WorkflowError::Unauthenticated));
        };
        let Some(image) = self.image.clone() else {
            return Err(self.reject("process an image"));
        };

        info!("Submitting {} ({} bytes) for analysis", image.name(), image.len());
        self.state = WorkflowState::Processing;
        self.in_flight = Some(self.cycle);
        self.last_error = None;
        Ok(ProcessTicket {
            cycle: self.cycle,
            image,
            credential,
        })
    }

    pub fn finish_process(&mut self, completion: ProcessCompletion<ProcessedCase<P>>) -> Result<Followup, WorkflowError> {
        let ProcessCompletion { ticket, outcome } = completion;
        if self.in_flight == Some(ticket.cycle) {
            self.in_flight = None;
        }

        if ticket.cycle != self.cycle || self.state != WorkflowState::Processing {
            debug!("Dropping analysis from superseded cycle {}", ticket.cycle);
            let discard = outcome.ok().map(|case| DiscardTemp {
                temp_id: case.result.temp_id,
                credential: ticket.credential,
            });
            return Ok(Followup { discard, leave: false });
        }

        if self.abandon_queued {
            let discard = match outcome {
                Ok(case) => Some(DiscardTemp {
                    temp_id: case.result.temp_id,
                    credential: ticket.credential,
                }),
                Err(err) => {
                    warn!("Analysis failed after leave was requested: {}", err);
                    None
                }
            };
            self.close(WorkflowState::Abandoned);
            return Ok(Followup::leave(discard));
        }

        match outcome {
            Ok(ProcessedCase { result, preview }) => {
                info!(
                    "Analysis {} ready: {} ({:.1}%)",
                    result.temp_id, result.pred_label, result.pred_accuracy
                );
                self.held = Some(Held {
                    result,
                    owner: ticket.credential,
                });
                self.result_preview = Some(preview);
                self.state = WorkflowState::Resulted;
                Ok(Followup::none())
            }
            Err(err) => {
                self.state = WorkflowState::Ready;
                Err(self.report(err))
            }
        }
    }

    pub fn begin_commit(&mut self, session: &Session) -> Result<CommitTicket, WorkflowError> {
        if !self.can_commit() {
            return Err(self.reject("save the case"));
        }
        let Some(credential) = session.intern_credential().cloned() else {
            return Err(self.report(WorkflowError::Unauthenticated));
        };
        let Some(temp_id) = self.held.as_ref().map(|held| held.result.temp_id.clone()) else {
            return Err(self.reject("save the case"));
        };

        info!("Saving case from {}", temp_id);
        self.state = WorkflowState::Committing;
        self.last_error = None;
        Ok(CommitTicket {
            request: CommitRequest {
                temp_id,
                notes: self.notes.clone(),
            },
            credential,
        })
    }

    pub fn finish_commit(&mut self, completion: CommitCompletion) -> Result<Followup, WorkflowError> {
        if self.state != WorkflowState::Committing {
            return Err(self.reject("finish saving"));
        }
        let CommitCompletion { ticket, outcome } = completion;

        match outcome {
            Ok(record) => {
                info!("Case {} saved from {}", record.case_id, ticket.request.temp_id);
                let discard = self.take_result();
                self.record = Some(record);
                self.close(WorkflowState::Committed);
                Ok(Followup::leave(discard))
            }
            Err(err) if self.abandon_queued => {
                warn!("Saving failed after leave was requested: {}", err);
                let discard = self.take_result();
                self.close(WorkflowState::Abandoned);
                Ok(Followup::leave(discard))
            }
            Err(err) => {
                self.state = WorkflowState::Resulted;
                Err(self.report(err))
            }
        }
    }

    /// Leaves the workflow without saving. While a call is in flight the
    /// request is queued and applied when that call completes.
    pub fn abandon(&mut self) -> Result<Followup, WorkflowError> {
        if self.state.is_terminal() {
            return Err(self.reject("leave"));
        }
        if self.state.is_in_flight() {
            info!("Leave requested while {}; waiting for the request to finish", self.state);
            self.abandon_queued = true;
            return Ok(Followup::none());
        }

        let discard = self.take_result();
        self.close(WorkflowState::Abandoned);
        Ok(Followup::leave(discard))
    }

    fn take_result(&mut self) -> Option<DiscardTemp> {
        self.result_preview = None;
        self.held.take().map(|held| DiscardTemp {
            temp_id: held.result.temp_id,
            credential: held.owner,
        })
    }

    fn close(&mut self, state: WorkflowState) {
        debug!("Workflow {} -> {}", self.state, state);
        self.state = state;
        self.abandon_queued = false;
        self.in_flight = None;
        self.held = None;
        self.result_preview = None;
        self.image_preview = None;
        self.image = None;
    }

    fn reject(&mut self, operation: &'static str) -> WorkflowError {
        self.report(WorkflowError::InvalidState {
            operation,
            state: self.state,
        })
    }

    fn report(&mut self, err: WorkflowError) -> WorkflowError {
        match &err {
            WorkflowError::InvalidState { .. } => warn!("{}", err),
            _ => error!("{}", err),
        }
        self.last_error = Some(err.to_string());
        err
    }
}
