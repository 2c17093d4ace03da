use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::core::{ExtractedRecord, Page};
use crate::fields::{
    NameSource, PageView, ProblemName, extract_difficulty, extract_language,
    extract_performance, extract_problem_name, extract_status, extract_test_cases,
};
use crate::snapshot::{ProblemSnapshot, Snapshot, SubmissionSnapshot};

/// A record under construction, with the provenance the retry pass needs.
pub(crate) struct Draft {
    pub(crate) record: ExtractedRecord,
    pub(crate) name_source: NameSource,
    pub(crate) problem: Option<ProblemSnapshot>,
    pub(crate) submission: Option<SubmissionSnapshot>,
}

impl Draft {
    /// Unknown difficulty, a name that is not the page's own title, or no
    /// statement: the page has probably not finished hydrating.
    pub(crate) fn looks_incomplete(&self) -> bool {
        !self.record.difficulty.is_known()
            || matches!(self.name_source, NameSource::UrlSlug | NameSource::Fallback)
            || self.record.description_html.is_none()
    }

    pub(crate) fn has_snapshot_code(&self) -> bool {
        self.submission.is_some()
    }
}

fn snapshot_title(problem: Option<&ProblemSnapshot>) -> Option<ProblemName> {
    let title = problem?.title.as_deref()?.trim();
    (!title.is_empty()).then(|| ProblemName {
        text: title.to_string(),
        source: NameSource::Snapshot,
    })
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One synchronous read of the page: snapshot first, DOM heuristics for
/// whatever it lacks. `code` is left empty when the snapshot has none; the
/// caller runs code recovery.
pub(crate) fn first_pass<P: Page + ?Sized>(page: &P) -> Draft {
    let url = page.url();
    let doc = page.document();
    let snapshot = Snapshot::read(&doc);
    let problem = snapshot.as_ref().and_then(Snapshot::problem);
    let submission = snapshot.as_ref().and_then(Snapshot::submission);
    debug!(
        snapshot = snapshot.is_some(),
        problem = problem.is_some(),
        submission = submission.is_some(),
        "snapshot read"
    );

    let view = PageView::new(&doc, &url, snapshot.as_ref());

    let name = snapshot_title(problem.as_ref()).unwrap_or_else(|| extract_problem_name(&view));
    let difficulty = problem
        .as_ref()
        .and_then(|p| p.difficulty)
        .unwrap_or_else(|| extract_difficulty(&view));
    let language = submission
        .as_ref()
        .and_then(|s| s.lang.clone())
        .unwrap_or_else(|| extract_language(&view));
    let code = submission
        .as_ref()
        .map(|s| s.code.clone())
        .unwrap_or_default();

    let record = ExtractedRecord {
        problem_name: name.text,
        difficulty,
        language,
        code,
        status: extract_status(&view),
        test_cases: extract_test_cases(&view),
        performance: extract_performance(&view),
        tags: problem
            .as_ref()
            .and_then(|p| p.tags.clone())
            .unwrap_or_default(),
        description_html: problem.as_ref().and_then(|p| p.content.clone()),
        url: url.to_string(),
        timestamp: now_iso(),
        notes: String::new(),
    };

    Draft {
        record,
        name_source: name.source,
        problem,
        submission,
    }
}

/// Re-reads the snapshot and overlays the snapshot-derived fields. DOM
/// heuristics are not re-run.
pub(crate) fn refresh_from_snapshot<P: Page + ?Sized>(page: &P, draft: &mut Draft) {
    let snapshot = {
        let doc = page.document();
        Snapshot::read(&doc)
    };
    if let Some(p) = snapshot.as_ref().and_then(Snapshot::problem) {
        draft.problem = Some(p);
    }
    if let Some(s) = snapshot.as_ref().and_then(Snapshot::submission) {
        draft.submission = Some(s);
    }

    if let Some(submission) = draft.submission.as_ref() {
        draft.record.code.clone_from(&submission.code);
        if let Some(lang) = submission.lang.clone() {
            draft.record.language = lang;
        }
    }

    let Some(problem) = draft.problem.as_ref() else {
        debug!("snapshot still has no problem payload");
        return;
    };
    if let Some(name) = snapshot_title(Some(problem)) {
        draft.record.problem_name = name.text;
        draft.name_source = name.source;
    }
    if let Some(d) = problem.difficulty {
        draft.record.difficulty = d;
    }
    if let Some(tags) = problem.tags.clone() {
        draft.record.tags = tags;
    }
    if let Some(content) = problem.content.clone() {
        draft.record.description_html = Some(content);
    }
}
