// src/forms/social.rs

//! Comment, rating and sign-up forms

use super::fields::{FieldDef, styled};
use crate::db::models::RATING_RANGE;
use regex::Regex;
use std::sync::LazyLock;

pub const USERNAME_MAX_LEN: usize = 30;
pub const NAME_MAX_LEN: usize = 50;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@\w{3,}$").unwrap());

pub fn comment_form() -> Vec<FieldDef> {
    vec![styled(
        FieldDef::new("text", "Comment")
            .placeholder("Write a comment...")
            .attr("rows", "5")
            .required(),
    )]
}

pub fn rating_form() -> Vec<FieldDef> {
    vec![
        FieldDef::new("rating", "")
            .required()
            .int_range(*RATING_RANGE.start(), *RATING_RANGE.end()),
    ]
}

pub fn sign_up_form() -> Vec<FieldDef> {
    vec![
        styled(
            FieldDef::new("first_name", "First name")
                .placeholder("Enter your first name")
                .required()
                .max_len(NAME_MAX_LEN),
        ),
        styled(
            FieldDef::new("last_name", "Last name")
                .placeholder("Enter your last name")
                .required()
                .max_len(NAME_MAX_LEN),
        ),
        styled(
            FieldDef::new("username", "Username")
                .placeholder("Enter your username")
                .required()
                .max_len(USERNAME_MAX_LEN)
                .pattern(
                    &USERNAME_RE,
                    "Username must start with @ and have at least 3 characters.",
                ),
        ),
        styled(
            FieldDef::new("email", "Email")
                .placeholder("Enter your email")
                .required()
                .email(),
        ),
    ]
}
