use crate::api::CaseApi;
use crate::controller::{CommitCompletion, CommitTicket, DiscardTemp, ProcessCompletion, ProcessTicket};
use crate::error::WorkflowError;
use crate::state::ProvisionalResult;
use log::{debug, error, warn};

/// Inference output plus the raw Grad-CAM bytes, before the caller turns
/// them into a displayable preview.
#[derive(Debug)]
pub struct Analysis {
    pub result: ProvisionalResult,
    pub artifact: Vec<u8>,
}

/// Submits the ticket's image and fetches the Grad-CAM overlay with the
/// same credential. If the overlay cannot be fetched the fresh provisional
/// result is discarded before the error is reported.
pub async fn run_process<A: CaseApi>(api: &A, ticket: ProcessTicket) -> ProcessCompletion<Analysis> {
    let outcome = analyse(api, &ticket).await;
    ProcessCompletion { ticket, outcome }
}

async fn analyse<A: CaseApi>(api: &A, ticket: &ProcessTicket) -> Result<Analysis, WorkflowError> {
    let response = api.submit(ticket.image(), ticket.credential()).await?;
    let result = ProvisionalResult::from(response);
    debug!("Inference returned {}, fetching {}", result.temp_id, result.gradcam_reference);

    match api.fetch_artifact(&result.gradcam_reference, ticket.credential()).await {
        Ok(artifact) => Ok(Analysis { result, artifact }),
        Err(err) => {
            error!("Fetching Grad-CAM for {} failed: {}", result.temp_id, err);
            discard_best_effort(
                api,
                DiscardTemp {
                    temp_id: result.temp_id,
                    credential: ticket.credential().clone(),
                },
            )
            .await;
            Err(err.into())
        }
    }
}

pub async fn run_commit<A: CaseApi>(api: &A, ticket: CommitTicket) -> CommitCompletion {
    let outcome = api
        .commit(ticket.request(), ticket.credential())
        .await
        .map_err(WorkflowError::from);
    CommitCompletion { ticket, outcome }
}

/// Deletes a provisional result, logging and swallowing any failure.
pub async fn discard_best_effort<A: CaseApi>(api: &A, discard: DiscardTemp) {
    match api.discard_temp(&discard.temp_id, &discard.credential).await {
        Ok(()) => debug!("Discarded provisional result {}", discard.temp_id),
        Err(err) => warn!("Could not discard provisional result {}: {}", discard.temp_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{CaseWorkflow, Followup, ProcessedCase};
    use crate::error::ApiError;
    use crate::state::WorkflowState;
    use crate::test_support::{Call, MockApi, Probe, Releases, image, intern, record, response};
    use futures::executor::block_on;
    use shared::TempId;

    fn settle(api: &MockApi, followup: Followup) -> bool {
        if let Some(discard) = followup.discard {
            block_on(discard_best_effort(api, discard));
        }
        followup.leave
    }

    fn process(api: &MockApi, workflow: &mut CaseWorkflow<Probe>, releases: &Releases) -> Result<Followup, WorkflowError> {
        let ticket = workflow.begin_process(&intern())?;
        let completion = block_on(run_process(api, ticket));
        let releases = releases.clone();
        workflow.finish_process(completion.map(|analysis| ProcessedCase {
            preview: Probe::new(&format!("gradcam-{}", analysis.result.temp_id), &releases),
            result: analysis.result,
        }))
    }

    fn select(api: &MockApi, workflow: &mut CaseWorkflow<Probe>, name: &str, releases: &Releases) {
        if let Some(discard) = workflow.select_image(image(name), Probe::new(name, releases)).unwrap() {
            block_on(discard_best_effort(api, discard));
        }
    }

    fn commit(api: &MockApi, workflow: &mut CaseWorkflow<Probe>) -> Result<Followup, WorkflowError> {
        let ticket = workflow.begin_commit(&intern())?;
        let completion = block_on(run_commit(api, ticket));
        workflow.finish_commit(completion)
    }

    #[test]
    fn analysis_fetches_gradcam_with_same_credential() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "hand.png", &releases);

        let followup = process(&api, &mut workflow, &releases).unwrap();
        assert_eq!(followup, Followup::default());
        assert_eq!(
            api.calls(),
            vec![
                Call::Submit("hand.png".into()),
                Call::FetchArtifact("/api/v1/records/T1/gradcam".into()),
            ]
        );
        let result = workflow.result().unwrap();
        assert_eq!(result.pred_label, "positive");
        assert_eq!(result.pred_accuracy, 78.5);
    }

    #[test]
    fn rejected_process_makes_no_network_call() {
        let api = MockApi::default();
        let releases = Releases::default();
        let mut workflow = CaseWorkflow::new();

        assert!(process(&api, &mut workflow, &releases).is_err());

        select(&api, &mut workflow, "a", &releases);
        let err = workflow.begin_process(&shared::Session::signed_out()).unwrap_err();
        assert_eq!(err, WorkflowError::Unauthenticated);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn failed_submit_leaves_no_temp_id() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Err(ApiError::Server {
            status: 400,
            message: "Empty xray upload".into(),
        }));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);

        let err = process(&api, &mut workflow, &releases).unwrap_err();
        assert_eq!(err.to_string(), "Empty xray upload");
        assert_eq!(workflow.state(), WorkflowState::Ready);
        assert!(workflow.result().is_none());
        assert!(api.discards().is_empty());
    }

    #[test]
    fn failed_gradcam_fetch_discards_fresh_result() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        api.push_artifact(Err(ApiError::Server {
            status: 404,
            message: "Gradcam image not found".into(),
        }));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);

        let err = process(&api, &mut workflow, &releases).unwrap_err();
        assert_eq!(err.to_string(), "Gradcam image not found");
        assert_eq!(api.discards(), vec![TempId::new("T1")]);
        assert_eq!(workflow.state(), WorkflowState::Ready);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn commit_without_result_makes_no_network_call() {
        let api = MockApi::default();
        let mut workflow = CaseWorkflow::<Probe>::new();

        let err = commit(&api, &mut workflow).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState { .. }));
        assert!(api.calls().is_empty());
    }

    // select A -> process T1 -> select B: one discard of T1, back to Ready
    #[test]
    fn new_selection_discards_previous_temp() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);
        let _ = process(&api, &mut workflow, &releases).unwrap();

        select(&api, &mut workflow, "b", &releases);

        assert_eq!(api.discards(), vec![TempId::new("T1")]);
        assert_eq!(workflow.state(), WorkflowState::Ready);
        assert!(workflow.can_process());
    }

    // process T1 -> commit fails -> still Resulted with T1, retry succeeds
    #[test]
    fn failed_commit_can_be_retried() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        api.push_commit(Err(ApiError::Server {
            status: 500,
            message: "Redis unavailable".into(),
        }));
        api.push_commit(Ok(record("case-1")));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);
        let _ = process(&api, &mut workflow, &releases).unwrap();
        workflow.set_notes("note").unwrap();

        let err = commit(&api, &mut workflow).unwrap_err();
        assert_eq!(err.to_string(), "Redis unavailable");
        assert_eq!(workflow.state(), WorkflowState::Resulted);
        assert_eq!(workflow.result().unwrap().temp_id, TempId::new("T1"));
        assert_eq!(workflow.result().unwrap().pred_accuracy, 78.5);
        assert!(api.discards().is_empty());

        let followup = commit(&api, &mut workflow).unwrap();
        assert!(settle(&api, followup));
        assert_eq!(workflow.state(), WorkflowState::Committed);
    }

    #[test]
    fn successful_commit_discards_exactly_once() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        api.push_commit(Ok(record("case-1")));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);
        let _ = process(&api, &mut workflow, &releases).unwrap();
        workflow.set_notes("note").unwrap();

        let followup = commit(&api, &mut workflow).unwrap();
        assert!(settle(&api, followup));

        assert_eq!(workflow.state(), WorkflowState::Committed);
        assert_eq!(api.discards(), vec![TempId::new("T1")]);
        assert!(api.calls().contains(&Call::Commit(shared::CommitRequest {
            temp_id: TempId::new("T1"),
            notes: "note".into(),
        })));
    }

    // process T1 -> abandon: one discard attempt even when it fails
    #[test]
    fn abandon_attempts_discard_even_if_it_fails() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        api.fail_discards(ApiError::Network("connection reset".into()));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);
        let _ = process(&api, &mut workflow, &releases).unwrap();

        let followup = workflow.abandon().unwrap();
        assert!(settle(&api, followup));

        assert_eq!(api.discards(), vec![TempId::new("T1")]);
        assert_eq!(workflow.state(), WorkflowState::Abandoned);
        assert!(workflow.last_error().is_none());
    }

    #[test]
    fn queued_abandon_discards_result_that_arrives_late() {
        let api = MockApi::default();
        let releases = Releases::default();
        api.push_submit(Ok(response("T1")));
        let mut workflow = CaseWorkflow::new();
        select(&api, &mut workflow, "a", &releases);

        let ticket = workflow.begin_process(&intern()).unwrap();
        assert!(!settle(&api, workflow.abandon().unwrap()));
        let completion = block_on(run_process(&api, ticket));
        let followup = workflow
            .finish_process(completion.map(|analysis| ProcessedCase {
                result: analysis.result,
                preview: Probe::new("gradcam", &releases),
            }))
            .unwrap();

        assert!(settle(&api, followup));
        assert_eq!(api.discards(), vec![TempId::new("T1")]);
        assert_eq!(workflow.state(), WorkflowState::Abandoned);
        assert_eq!(releases.count(), 2);
    }
}
