//! Snapshot, actions and the reducer.

use super::LabModule;
use crate::advisor::prompt::lab_trigger_message;
use crate::advisor::{
    advice_request, lab_request, render_advice, render_lab_reply, AdvisorError, AdvisorProvider,
    AdvisorReply, AdvisorRequest, ChatMessage, InlineImage, LabAnalysisKind, LabPayload,
};
use crate::config::AdvisorConfig;
use crate::geochem::GeochemData;
use crate::geochron::{AgeCollection, AgeDraft};
use crate::ingest::{ingest, IngestFormat};
use crate::library::find_regional_case;
use crate::model::age::AgeId;
use crate::model::composition::CompositionSample;
use log::{debug, info, warn};
use std::sync::Arc;

/// Everything the workspace renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub config: Arc<AdvisorConfig>,
    pub active_module: LabModule,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub pending_image: Option<InlineImage>,
    pub is_loading: bool,
    pub composition: CompositionSample,
    pub geochem: GeochemData,
    pub age_draft: AgeDraft,
    pub ages: AgeCollection,
    /// Outcome of the last action that reports one.
    pub diagnostic: Option<Diagnostic>,
}

impl SessionState {
    /// Fresh session on the QFL plotter with the greeting in the transcript.
    pub fn new(config: Arc<AdvisorConfig>) -> Self {
        let greeting = ChatMessage::model(config.greeting.clone());
        Self {
            config,
            active_module: LabModule::Qfl,
            messages: vec![greeting],
            input: String::new(),
            pending_image: None,
            is_loading: false,
            composition: CompositionSample::default(),
            geochem: GeochemData::default(),
            age_draft: AgeDraft::default(),
            ages: AgeCollection::new(),
            diagnostic: None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Arc::new(AdvisorConfig::default()))
    }
}

/// Status line for the UI; never blocks later actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Ingested { accepted: usize, skipped: usize },
    IngestFailed(String),
    InvalidAgeEntry(String),
    InvalidImage(String),
    UnknownRegion(String),
    InvalidPayload(String),
}

/// User or collaborator event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectModule(LabModule),
    SetComposition(CompositionSample),
    SetGeochem(GeochemData),
    SetAgeDraft(AgeDraft),
    /// Validates `age_draft` and appends it.
    AddAgeEntry,
    RemoveAge(AgeId),
    IngestAges { text: String, format: IngestFormat },
    SetInput(String),
    /// Data URL of the chosen image.
    AttachImage(String),
    ClearImage,
    Submit,
    Analyze(LabPayload),
    AnalyzeComposition,
    AnalyzeWeathering,
    AnalyzeAges,
    ReferenceRegion(String),
    AdviceReceived(Result<AdvisorReply, AdvisorError>),
    LabReplyReceived(Result<AdvisorReply, AdvisorError>),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::SelectModule(_) => "select_module",
            Self::SetComposition(_) => "set_composition",
            Self::SetGeochem(_) => "set_geochem",
            Self::SetAgeDraft(_) => "set_age_draft",
            Self::AddAgeEntry => "add_age_entry",
            Self::RemoveAge(_) => "remove_age",
            Self::IngestAges { .. } => "ingest_ages",
            Self::SetInput(_) => "set_input",
            Self::AttachImage(_) => "attach_image",
            Self::ClearImage => "clear_image",
            Self::Submit => "submit",
            Self::Analyze(_) => "analyze",
            Self::AnalyzeComposition => "analyze_composition",
            Self::AnalyzeWeathering => "analyze_weathering",
            Self::AnalyzeAges => "analyze_ages",
            Self::ReferenceRegion(_) => "reference_region",
            Self::AdviceReceived(_) => "advice_received",
            Self::LabReplyReceived(_) => "lab_reply_received",
        }
    }
}

/// Advisor call the host must perform, answered with the matching
/// `*Received` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestAdvice(AdvisorRequest),
    RequestLabAnalysis(AdvisorRequest),
}

impl Effect {
    pub fn request(&self) -> &AdvisorRequest {
        match self {
            Self::RequestAdvice(request) | Self::RequestLabAnalysis(request) => request,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn state(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

/// Computes the next snapshot for `action`.
pub fn reduce(state: &SessionState, action: Action) -> Transition {
    debug!("event=session_action module=session action={}", action.name());
    let mut next = state.clone();

    match action {
        Action::SelectModule(module) => next.active_module = module,
        Action::SetComposition(sample) => next.composition = sample,
        Action::SetGeochem(data) => next.geochem = data,
        Action::SetAgeDraft(draft) => next.age_draft = draft,
        Action::AddAgeEntry => match next.age_draft.to_record() {
            Ok(record) => {
                next.ages = next.ages.appended([record]);
                next.age_draft = AgeDraft::default();
                next.diagnostic = None;
            }
            Err(err) => next.diagnostic = Some(Diagnostic::InvalidAgeEntry(err.to_string())),
        },
        Action::RemoveAge(id) => next.ages = next.ages.without(id),
        Action::IngestAges { text, format } => match ingest(&text, format) {
            Ok(report) => {
                next.diagnostic = Some(Diagnostic::Ingested {
                    accepted: report.accepted_count(),
                    skipped: report.skipped_count(),
                });
                next.ages = next.ages.appended(report.records);
            }
            Err(err) => next.diagnostic = Some(Diagnostic::IngestFailed(err.to_string())),
        },
        Action::SetInput(text) => next.input = text,
        Action::AttachImage(data_url) => match InlineImage::from_data_url(&data_url) {
            Ok(image) => next.pending_image = Some(image),
            Err(err) => next.diagnostic = Some(Diagnostic::InvalidImage(err.to_string())),
        },
        Action::ClearImage => next.pending_image = None,
        Action::Submit => return submit(next),
        Action::Analyze(payload) => return analyze(next, payload),
        Action::AnalyzeComposition => {
            let payload = LabPayload::qfl(next.composition);
            return analyze(next, payload);
        }
        Action::AnalyzeWeathering => {
            let payload = LabPayload::weathering(next.geochem);
            return analyze(next, payload);
        }
        Action::AnalyzeAges => {
            let payload = LabPayload::geochronology(&next.ages);
            return analyze(next, payload);
        }
        Action::ReferenceRegion(name) => match find_regional_case(&name) {
            Some(case) => return analyze(next, LabPayload::regional(*case)),
            None => next.diagnostic = Some(Diagnostic::UnknownRegion(name.trim().to_string())),
        },
        Action::AdviceReceived(result) => {
            next.is_loading = false;
            let content = match result {
                Ok(reply) => {
                    next.pending_image = None;
                    render_advice(&reply, &next.config)
                }
                Err(err) => {
                    warn!(
                        "event=advice_reply module=session status=error code={}",
                        err.code()
                    );
                    next.config.advice_failure_message.clone()
                }
            };
            next.messages.push(ChatMessage::model(content));
        }
        Action::LabReplyReceived(result) => {
            next.is_loading = false;
            let content = match result {
                Ok(reply) => {
                    let rendered = render_lab_reply(&reply);
                    if rendered.trim().is_empty() {
                        next.config.empty_advice_message.clone()
                    } else {
                        rendered
                    }
                }
                Err(err) => {
                    warn!(
                        "event=lab_reply module=session status=error code={}",
                        err.code()
                    );
                    next.config.lab_failure_message.clone()
                }
            };
            next.messages.push(ChatMessage::model(content));
        }
    }

    Transition::state(next)
}

fn submit(mut next: SessionState) -> Transition {
    if next.is_loading || (next.input.trim().is_empty() && next.pending_image.is_none()) {
        return Transition::state(next);
    }
    let content = std::mem::take(&mut next.input);
    next.messages.push(ChatMessage::user(content));
    next.is_loading = true;
    let request = advice_request(&next.config, &next.messages, next.pending_image.as_ref());
    Transition {
        state: next,
        effect: Some(Effect::RequestAdvice(request)),
    }
}

fn analyze(mut next: SessionState, payload: LabPayload) -> Transition {
    if next.is_loading {
        return Transition::state(next);
    }
    if payload.kind == LabAnalysisKind::GeochronologyInterpretation && next.ages.is_empty() {
        return Transition::state(next);
    }
    let data_json = match payload.data_json() {
        Ok(json) => json,
        Err(err) => {
            next.diagnostic = Some(Diagnostic::InvalidPayload(err.to_string()));
            return Transition::state(next);
        }
    };
    info!(
        "event=lab_analysis module=session status=ok kind={:?}",
        payload.kind
    );
    next.messages
        .push(ChatMessage::user(lab_trigger_message(payload.kind, &data_json)));
    next.is_loading = true;
    let request = lab_request(&next.config, payload.kind, &data_json);
    Transition {
        state: next,
        effect: Some(Effect::RequestLabAnalysis(request)),
    }
}

/// Runs `action` and, when it yields an effect, performs the advisor call
/// synchronously through `provider` and applies the reply.
pub fn drive(
    state: &SessionState,
    action: Action,
    provider: &dyn AdvisorProvider,
) -> SessionState {
    let transition = reduce(state, action);
    let Some(effect) = transition.effect else {
        return transition.state;
    };
    debug!(
        "event=advisor_call module=session provider={} model={}",
        provider.provider_id(),
        effect.request().model
    );
    let reply = provider.generate(effect.request());
    let follow_up = match effect {
        Effect::RequestAdvice(_) => Action::AdviceReceived(reply),
        Effect::RequestLabAnalysis(_) => Action::LabReplyReceived(reply),
    };
    reduce(&transition.state, follow_up).state
}
