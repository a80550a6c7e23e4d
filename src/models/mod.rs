//! Entities served by the API and their create/update forms
//!
//! Each entity module pairs the server shape (`Lesson`) with its form
//! (`LessonForm`) and a marker type (`Lessons`) implementing
//! [`Resource`](crate::api::Resource).

pub mod answer;
pub mod common;
pub mod lesson;
pub mod lesson_content;
pub mod matrix;
pub mod matrix_detail;
pub mod quiz;
pub mod quiz_attempt;
pub mod student;
pub mod teacher;
pub mod unit;
pub mod validation;

pub use answer::{Answer, AnswerForm, Answers};
pub use common::{Audit, Status};
pub use lesson::{Lesson, LessonForm, Lessons};
pub use lesson_content::{LessonContent, LessonContentForm, LessonContents};
pub use matrix::{Matrices, Matrix, MatrixForm};
pub use matrix_detail::{MatrixDetail, MatrixDetailForm, MatrixDetails};
pub use quiz::{Quiz, QuizForm, Quizzes};
pub use quiz_attempt::{QuizAttempt, QuizAttemptForm, QuizAttempts};
pub use student::{Student, StudentForm, Students};
pub use teacher::{Teacher, TeacherForm, Teachers};
pub use unit::{Unit, UnitForm, Units};
pub use validation::{FieldError, Validate};
