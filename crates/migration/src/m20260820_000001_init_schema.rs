use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 36).primary_key())
                    .col(string_len(User::Username, 50).unique_key())
                    .col(string_len(User::Email, 255).unique_key())
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Problem::Table)
                    .if_not_exists()
                    .col(string_len(Problem::Id, 36).primary_key())
                    .col(string_len(Problem::Title, 200).unique_key())
                    .col(text(Problem::Description))
                    // Difficulty enum is represented in app code. DB stores compact numeric code.
                    // 0=easy, 1=medium, 2=hard
                    .col(
                        small_integer(Problem::Difficulty)
                            .check(Expr::col(Problem::Difficulty).gte(0))
                            .check(Expr::col(Problem::Difficulty).lte(2)),
                    )
                    .col(text(Problem::SampleInput))
                    .col(text(Problem::SampleOutput))
                    .col(text(Problem::Constraints))
                    .col(text_null(Problem::Visual))
                    .col(timestamp(Problem::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TestCase::Table)
                    .if_not_exists()
                    .col(string_len(TestCase::Id, 36).primary_key())
                    .col(string_len(TestCase::ProblemId, 36))
                    .col(text(TestCase::Input))
                    .col(text(TestCase::ExpectedOutput))
                    .col(timestamp(TestCase::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-test_cases-problem_id")
                            .from(TestCase::Table, TestCase::ProblemId)
                            .to(Problem::Table, Problem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(string_len(Submission::Id, 36).primary_key())
                    .col(string_len(Submission::UserId, 36))
                    .col(string_len(Submission::ProblemId, 36))
                    .col(text(Submission::Code))
                    .col(text(Submission::Output))
                    .col(integer(Submission::PassedTests).default(0))
                    .col(integer(Submission::TotalTests).default(0))
                    .col(string_len(Submission::Language, 50))
                    // Verdict enum is represented in app code.
                    // 0=run, 1=passed, 2=partially_passed, 3=failed
                    .col(
                        small_integer(Submission::Verdict)
                            .check(Expr::col(Submission::Verdict).gte(0))
                            .check(Expr::col(Submission::Verdict).lte(3)),
                    )
                    .col(big_integer_null(Submission::TimeSpentSecs))
                    .col(timestamp(Submission::SubmittedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submissions-user_id")
                            .from(Submission::Table, Submission::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submissions-problem_id")
                            .from(Submission::Table, Submission::ProblemId)
                            .to(Problem::Table, Problem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assessment::Table)
                    .if_not_exists()
                    .col(string_len(Assessment::Id, 36).primary_key())
                    .col(string_len(Assessment::AccessCode, 50).unique_key())
                    .col(integer(Assessment::TimeLimitMinutes))
                    .col(boolean(Assessment::Active).default(true))
                    .col(timestamp(Assessment::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentProblem::Table)
                    .if_not_exists()
                    .col(string_len(AssessmentProblem::AssessmentId, 36))
                    .col(string_len(AssessmentProblem::ProblemId, 36))
                    .primary_key(
                        Index::create()
                            .col(AssessmentProblem::AssessmentId)
                            .col(AssessmentProblem::ProblemId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessment_problems-assessment_id")
                            .from(AssessmentProblem::Table, AssessmentProblem::AssessmentId)
                            .to(Assessment::Table, Assessment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessment_problems-problem_id")
                            .from(AssessmentProblem::Table, AssessmentProblem::ProblemId)
                            .to(Problem::Table, Problem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentSession::Table)
                    .if_not_exists()
                    .col(string_len(AssessmentSession::Id, 36).primary_key())
                    .col(string_len(AssessmentSession::AssessmentId, 36))
                    .col(string_len(AssessmentSession::CandidateEmail, 255))
                    .col(timestamp(AssessmentSession::StartedAt))
                    .col(boolean(AssessmentSession::Completed).default(false))
                    .col(timestamp_null(AssessmentSession::SubmittedAt))
                    .col(integer(AssessmentSession::Score).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessment_sessions-assessment_id")
                            .from(AssessmentSession::Table, AssessmentSession::AssessmentId)
                            .to(Assessment::Table, Assessment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One session per (assessment, candidate); concurrent starts race on
        // this index rather than on a read-then-write in app code.
        manager
            .create_index(
                Index::create()
                    .name("idx_assessment_sessions_assessment_candidate")
                    .table(AssessmentSession::Table)
                    .col(AssessmentSession::AssessmentId)
                    .col(AssessmentSession::CandidateEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_problem_id")
                    .table(TestCase::Table)
                    .col(TestCase::ProblemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_user_id")
                    .table(Submission::Table)
                    .col(Submission::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_problem_id")
                    .table(Submission::Table)
                    .col(Submission::ProblemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_verdict")
                    .table(Submission::Table)
                    .col(Submission::Verdict)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssessmentSession::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AssessmentProblem::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assessment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TestCase::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Problem::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Problem {
    Table,
    Id,
    Title,
    Description,
    Difficulty,
    SampleInput,
    SampleOutput,
    Constraints,
    Visual,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TestCase {
    Table,
    Id,
    ProblemId,
    Input,
    ExpectedOutput,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    UserId,
    ProblemId,
    Code,
    Output,
    PassedTests,
    TotalTests,
    Language,
    Verdict,
    TimeSpentSecs,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Assessment {
    Table,
    Id,
    AccessCode,
    TimeLimitMinutes,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AssessmentProblem {
    Table,
    AssessmentId,
    ProblemId,
}

#[derive(DeriveIden)]
enum AssessmentSession {
    Table,
    Id,
    AssessmentId,
    CandidateEmail,
    StartedAt,
    Completed,
    SubmittedAt,
    Score,
}
