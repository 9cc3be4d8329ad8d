use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as Jsonb;
use sqlx::{query, query_as, query_scalar, FromRow, PgExecutor, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::response::{Answer, AnswerValue};
use crate::models::survey::{Question, QuestionType, Survey};
use crate::response::Message;

fn validate_survey(title: &str, questions: &mut Vec<Question>) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::Validation("survey title must not be empty".into()));
    }
    if questions.is_empty() {
        return Err(Error::Validation("at least one question is required".into()));
    }
    for question in questions.iter_mut() {
        if question.text.trim().is_empty() {
            return Err(Error::Validation("question text must not be empty".into()));
        }
        match question.type_ {
            // Text questions carry no options, whatever the client sent.
            QuestionType::Text => question.options.clear(),
            _ if question.options.is_empty() => {
                return Err(Error::Validation("choice questions need at least one option".into()));
            }
            _ => {}
        }
    }
    Ok(())
}

async fn created_by<'a>(db: impl PgExecutor<'a>, survey_id: i32) -> Result<i32, Error> {
    query_scalar("SELECT created_by FROM surveys WHERE id = $1")
        .bind(survey_id)
        .fetch_optional(db)
        .await?
        .ok_or(Error::NotFound("survey"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyCreation {
    title: String,
    questions: Vec<Question>,
}

pub async fn create(user_info: UserInfo, Json(SurveyCreation { title, mut questions }): Json<SurveyCreation>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    validate_survey(&title, &mut questions)?;
    let mut conn = db.acquire().await?;
    let survey: Survey = query_as("INSERT INTO surveys (title, questions, created_by) VALUES ($1, $2, $3) RETURNING *")
        .bind(&title)
        .bind(Jsonb(&questions))
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(survey))
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: i32,
    title: String,
    created_at: DateTime<Utc>,
}

pub async fn list(db: Data<PgPool>) -> Result<Json<Vec<Item>>, Error> {
    let mut conn = db.acquire().await?;
    let surveys: Vec<Item> = query_as("SELECT id, title, created_at FROM surveys ORDER BY id")
        .fetch_all(&mut conn)
        .await?;
    Ok(Json(surveys))
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItem {
    id: i32,
    title: String,
    created_at: DateTime<Utc>,
    response_count: i32,
}

pub async fn owned(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<Vec<OwnedItem>>, Error> {
    let mut conn = db.acquire().await?;
    let surveys: Vec<OwnedItem> = query_as("SELECT id, title, created_at, response_count FROM surveys WHERE created_by = $1 ORDER BY id")
        .bind(user_info.id)
        .fetch_all(&mut conn)
        .await?;
    Ok(Json(surveys))
}

pub async fn detail(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Survey>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let survey: Survey = query_as("SELECT * FROM surveys WHERE id = $1")
        .bind(survey_id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or(Error::NotFound("survey"))?;
    Ok(Json(survey))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyUpdation {
    title: String,
    questions: Vec<Question>,
}

pub async fn update(user_info: UserInfo, survey_id: Path<(i32,)>, Json(SurveyUpdation { title, mut questions }): Json<SurveyUpdation>, db: Data<PgPool>) -> Result<Json<Survey>, Error> {
    let survey_id = survey_id.into_inner().0;
    validate_survey(&title, &mut questions)?;
    let mut tx = db.begin().await?;
    let owner = created_by(&mut tx, survey_id).await?;
    if owner != user_info.id {
        return Err(Error::Forbidden);
    }
    let survey: Survey = query_as("UPDATE surveys SET title = $1, questions = $2 WHERE id = $3 RETURNING *")
        .bind(&title)
        .bind(Jsonb(&questions))
        .bind(survey_id)
        .fetch_optional(&mut tx)
        .await?
        .ok_or(Error::NotFound("survey"))?;
    tx.commit().await?;
    Ok(Json(survey))
}

pub async fn delete_survey(user_info: UserInfo, survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Message>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut tx = db.begin().await?;
    let owner = created_by(&mut tx, survey_id).await?;
    if owner != user_info.id {
        return Err(Error::Forbidden);
    }
    query("DELETE FROM surveys WHERE id = $1")
        .bind(survey_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(Json(Message::new("survey deleted")))
}

#[derive(Debug, Deserialize)]
pub struct Submission {
    answers: IndexMap<String, AnswerValue>,
}

pub async fn respond(survey_id: Path<(i32,)>, Json(Submission { answers }): Json<Submission>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut tx = db.begin().await?;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM surveys WHERE id = $1)")
        .bind(survey_id)
        .fetch_one(&mut tx)
        .await?;
    if !exists {
        return Err(Error::NotFound("survey"));
    }
    query("INSERT INTO responses (survey_id, answers) VALUES ($1, $2)")
        .bind(survey_id)
        .bind(Jsonb(Answer::from_submission(answers)))
        .execute(&mut tx)
        .await?;
    query("UPDATE surveys SET response_count = response_count + 1 WHERE id = $1")
        .bind(survey_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(HttpResponse::build(StatusCode::CREATED).json(Message::new("response recorded")))
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    question_text: String,
    #[serde(rename = "type")]
    type_: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    answers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    option_counts: Option<Vec<usize>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    survey_title: String,
    total_responses: usize,
    results: Vec<QuestionResult>,
}

/// Tallies responses question by question. Answers are matched to
/// questions by position: the answer stored at index `i` of a response
/// belongs to question `i`. Responses shorter than the question list
/// contribute nothing to the remaining questions.
fn aggregate(questions: &[Question], responses: &[Vec<Answer>]) -> Vec<QuestionResult> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let collected: Vec<&Answer> = responses.iter().filter_map(|answers| answers.get(index)).collect();
            match question.type_ {
                QuestionType::Text => QuestionResult {
                    question_text: question.text.clone(),
                    type_: question.type_,
                    answers: Some(
                        collected
                            .iter()
                            .filter_map(|a| match &a.answer {
                                AnswerValue::Text(text) if !text.is_empty() => Some(text.clone()),
                                _ => None,
                            })
                            .collect(),
                    ),
                    options: None,
                    option_counts: None,
                },
                _ => {
                    let option_counts = question
                        .options
                        .iter()
                        .enumerate()
                        .map(|(option_index, _)| collected.iter().filter(|a| a.answer == AnswerValue::Index(option_index as i64)).count())
                        .collect();
                    QuestionResult {
                        question_text: question.text.clone(),
                        type_: question.type_,
                        answers: None,
                        options: Some(question.options.clone()),
                        option_counts: Some(option_counts),
                    }
                }
            }
        })
        .collect()
}

pub async fn results(user_info: UserInfo, survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<ResultsSummary>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let survey: Survey = query_as("SELECT * FROM surveys WHERE id = $1")
        .bind(survey_id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or(Error::NotFound("survey"))?;
    if survey.created_by != user_info.id {
        return Err(Error::Forbidden);
    }
    let rows: Vec<Jsonb<Vec<Answer>>> = query_scalar("SELECT answers FROM responses WHERE survey_id = $1 ORDER BY id")
        .bind(survey_id)
        .fetch_all(&mut conn)
        .await?;
    let responses: Vec<Vec<Answer>> = rows.into_iter().map(|Jsonb(answers)| answers).collect();
    Ok(Json(ResultsSummary {
        survey_title: survey.title,
        total_responses: responses.len(),
        results: aggregate(&survey.questions.0, &responses),
    }))
}
