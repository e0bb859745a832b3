//! In-memory doubles for the repository traits and the execution backend.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use codegrade_core::domain::{
    AssessmentId, CodeExecutor, Difficulty, ExecutorError, Language, ProblemId, SessionId,
    SubmissionId, TestCaseId, UserId, Verdict,
};
use codegrade_server::repository::{
    AssessmentRecord, AssessmentRepository, LeaderboardEntry, NewAssessment, NewProblem,
    NewSession, NewSubmission, NewTestCase, NewUser, ProblemRecord, ProblemRepository,
    SessionRecord, SessionRepository, SubmissionRecord, SubmissionRepository, TestCaseRecord,
    TestCaseRepository, UserRecord, UserRepository,
};

#[derive(Default)]
pub struct MockProblemRepository {
    problems: Mutex<Vec<ProblemRecord>>,
}

#[async_trait]
impl ProblemRepository for MockProblemRepository {
    async fn create(&self, new_problem: NewProblem) -> Result<ProblemRecord> {
        let record = ProblemRecord {
            id: ProblemId::new(),
            title: new_problem.title,
            description: new_problem.description,
            difficulty: new_problem.difficulty,
            sample_input: new_problem.sample_input,
            sample_output: new_problem.sample_output,
            constraints: new_problem.constraints,
            visual: new_problem.visual,
        };
        self.problems.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>> {
        Ok(self
            .problems
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == problem_id)
            .cloned())
    }

    async fn find_by_ids(&self, problem_ids: &[ProblemId]) -> Result<Vec<ProblemRecord>> {
        Ok(self
            .problems
            .lock()
            .unwrap()
            .iter()
            .filter(|p| problem_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<ProblemRecord>> {
        Ok(self.problems.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MockTestCaseRepository {
    test_cases: Mutex<Vec<TestCaseRecord>>,
}

#[async_trait]
impl TestCaseRepository for MockTestCaseRepository {
    async fn create(&self, new_test_case: NewTestCase) -> Result<TestCaseRecord> {
        let record = TestCaseRecord {
            id: TestCaseId::new(),
            problem_id: new_test_case.problem_id,
            input: new_test_case.input,
            expected_output: new_test_case.expected_output,
        };
        self.test_cases.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_by_problem(&self, problem_id: ProblemId) -> Result<Vec<TestCaseRecord>> {
        Ok(self
            .test_cases
            .lock()
            .unwrap()
            .iter()
            .filter(|tc| tc.problem_id == problem_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let record = UserRecord {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
        };
        self.users.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// Submission store that computes the leaderboard the same way the SQL
/// implementation does: difficulty points over fully passed submissions.
pub struct MockSubmissionRepository {
    submissions: Mutex<Vec<SubmissionRecord>>,
    problems: Arc<MockProblemRepository>,
    users: Arc<MockUserRepository>,
}

impl MockSubmissionRepository {
    pub fn new(problems: Arc<MockProblemRepository>, users: Arc<MockUserRepository>) -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            problems,
            users,
        }
    }

    pub fn all(&self) -> Vec<SubmissionRecord> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionRepository for MockSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let record = SubmissionRecord {
            id: SubmissionId::new(),
            user_id: new_submission.user_id,
            problem_id: new_submission.problem_id,
            code: new_submission.code,
            output: new_submission.output,
            passed_tests: new_submission.passed_tests,
            total_tests: new_submission.total_tests,
            language: new_submission.language,
            verdict: new_submission.verdict,
            time_spent_secs: new_submission.time_spent_secs,
            submitted_at: Utc::now().naive_utc(),
        };
        self.submissions.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<SubmissionRecord>> {
        let mut submissions: Vec<SubmissionRecord> = self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(submissions)
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let problems = self.problems.list_all().await?;
        let difficulties: HashMap<ProblemId, Difficulty> =
            problems.into_iter().map(|p| (p.id, p.difficulty)).collect();

        let mut totals: HashMap<UserId, u64> = HashMap::new();
        for submission in self.submissions.lock().unwrap().iter() {
            if submission.verdict != Verdict::Passed {
                continue;
            }
            let Some(difficulty) = difficulties.get(&submission.problem_id) else {
                continue;
            };
            *totals.entry(submission.user_id).or_default() += u64::from(difficulty.points());
        }

        let mut entries: Vec<LeaderboardEntry> = self
            .users
            .users
            .lock()
            .unwrap()
            .iter()
            .filter_map(|user| {
                totals.get(&user.id).map(|score| LeaderboardEntry {
                    username: user.username.clone(),
                    email: user.email.clone(),
                    score: *score,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.email.cmp(&b.email)));
        Ok(entries)
    }
}

#[derive(Default)]
pub struct MockAssessmentRepository {
    assessments: Mutex<Vec<AssessmentRecord>>,
}

#[async_trait]
impl AssessmentRepository for MockAssessmentRepository {
    async fn create(&self, new_assessment: NewAssessment) -> Result<AssessmentRecord> {
        let record = AssessmentRecord {
            id: AssessmentId::new(),
            access_code: new_assessment.access_code,
            problem_ids: new_assessment.problem_ids,
            time_limit_minutes: new_assessment.time_limit_minutes,
            active: true,
            created_at: Utc::now().naive_utc(),
        };
        self.assessments.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, assessment_id: AssessmentId) -> Result<Option<AssessmentRecord>> {
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == assessment_id)
            .cloned())
    }

    async fn find_by_access_code(&self, access_code: &str) -> Result<Option<AssessmentRecord>> {
        Ok(self
            .assessments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.access_code.as_str() == access_code)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<AssessmentRecord>> {
        Ok(self.assessments.lock().unwrap().clone())
    }

    async fn set_active(&self, assessment_id: AssessmentId, active: bool) -> Result<bool> {
        let mut assessments = self.assessments.lock().unwrap();
        match assessments.iter_mut().find(|a| a.id == assessment_id) {
            Some(assessment) => {
                assessment.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Session store with the same atomicity contract as the SQL version: the
/// uniqueness check and the insert happen under one lock.
#[derive(Default)]
pub struct MockSessionRepository {
    sessions: Mutex<Vec<SessionRecord>>,
}

impl MockSessionRepository {
    pub fn get(&self, session_id: SessionId) -> Option<SessionRecord> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn try_create(&self, new_session: NewSession) -> Result<Option<SessionRecord>> {
        let mut sessions = self.sessions.lock().unwrap();
        let duplicate = sessions.iter().any(|s| {
            s.assessment_id == new_session.assessment_id
                && s.candidate_email == new_session.candidate_email
        });
        if duplicate {
            return Ok(None);
        }

        let record = SessionRecord {
            id: SessionId::new(),
            assessment_id: new_session.assessment_id,
            candidate_email: new_session.candidate_email,
            started_at: Utc::now().naive_utc(),
            completed: false,
            submitted_at: None,
            score: 0,
        };
        sessions.push(record.clone());
        Ok(Some(record))
    }

    async fn find_by_id(&self, session_id: SessionId) -> Result<Option<SessionRecord>> {
        Ok(self.get(session_id))
    }

    async fn list_all(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn complete(
        &self,
        session_id: SessionId,
        score: i32,
        submitted_at: NaiveDateTime,
    ) -> Result<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions
            .iter_mut()
            .find(|s| s.id == session_id && !s.completed)
        {
            Some(session) => {
                session.completed = true;
                session.score = score;
                session.submitted_at = Some(submitted_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Execution backend double that replays a scripted queue of responses in
/// order; once the queue runs dry every call fails as unavailable.
pub struct MockExecutor {
    responses: Mutex<VecDeque<Result<String, ExecutorError>>>,
}

impl MockExecutor {
    pub fn scripted(responses: Vec<Result<String, ExecutorError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl CodeExecutor for MockExecutor {
    async fn execute(
        &self,
        _code: &str,
        _language: &Language,
        _stdin: &str,
    ) -> Result<String, ExecutorError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ExecutorError::Unavailable(
                    "no scripted response left".to_string(),
                ))
            })
    }
}

pub fn new_problem(title: &str, difficulty: Difficulty) -> NewProblem {
    NewProblem {
        title: title.to_string(),
        description: format!("Solve {title}."),
        difficulty,
        sample_input: "[2,7,11,15], 9".to_string(),
        sample_output: "[0, 1]".to_string(),
        constraints: "2 <= nums.length <= 10^4".to_string(),
        visual: None,
    }
}
