//! Use-case grammar validator
//!
//! Checks requirement text against the fixed section grammar:
//!
//! ```text
//! UsecaseName:        <name>
//! Description:        The goal of this use case is to allow <actor> to <action> in order to <value>
//! Actors:             <actor>[, <actor>]*
//! Entry Conditions:   line+   (each contains IS or HAS)
//! Flow of Events:     line+   (each starts with <integer>.)
//! Exit Conditions:    line+
//! Quality Requirement: line+  (runs to the end of the document)
//! ```
//!
//! Block sections may carry their first line on the header line itself.
//! Blank lines are skipped; reported line numbers always refer to the
//! original text.

use crate::document::{Description, FlowStep, RequirementDocument, Section};
use crate::error::{Expected, GrammarError, UseCaseResult};
use once_cell::sync::Lazy;
use regex::Regex;

static DESCRIPTION_TEMPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^the goal of this use case is to allow\s+(?P<actor>.+?)\s+to\s+(?P<action>.+?)\s+in order to\s+(?P<value>.+?)\s*\.?$",
    )
    .expect("description pattern is valid")
});

static ENTRY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:IS|HAS)\b").expect("entry token pattern is valid")
});

static STEP_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<number>\d+)\.").expect("step pattern is valid")
});

/// Non-blank line with its original 1-based number
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

/// Forward-only view over the non-blank lines of a document
struct Cursor<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
    end_line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(idx, raw)| Line {
                number: idx + 1,
                text: raw.trim(),
            })
            .filter(|line| !line.text.is_empty())
            .collect();
        Self {
            lines,
            pos: 0,
            end_line: text.lines().count() + 1,
        }
    }

    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn error_here(&self, expected: Expected) -> GrammarError {
        match self.peek() {
            Some(line) => GrammarError::new(line.number, expected, line.text),
            None => GrammarError::end_of_document(self.end_line, expected),
        }
    }

    /// Consume the header of `section`, returning its line and inline remainder
    fn expect_header(&mut self, section: Section) -> UseCaseResult<(Line<'a>, &'a str)> {
        let line = self
            .peek()
            .ok_or_else(|| self.error_here(Expected::Header(section)))?;
        match Section::split_header(line.text) {
            Some((found, rest)) if found == section => {
                self.advance();
                Ok((line, rest))
            }
            _ => Err(self.error_here(Expected::Header(section))),
        }
    }

    /// Consume a block section: header plus every line up to the next header
    fn take_block(&mut self, section: Section) -> UseCaseResult<Vec<Line<'a>>> {
        let (header, inline) = self.expect_header(section)?;
        let mut block = Vec::new();
        if !inline.is_empty() {
            block.push(Line {
                number: header.number,
                text: inline,
            });
        }
        while let Some(line) = self.peek() {
            if Section::split_header(line.text).is_some() {
                break;
            }
            block.push(line);
            self.advance();
        }
        if block.is_empty() {
            return Err(self.error_here(Expected::Content(section)));
        }
        Ok(block)
    }
}

/// Stateless validator for use-case documents
#[derive(Debug, Clone, Copy, Default)]
pub struct UseCaseValidator;

impl UseCaseValidator {
    /// Create new validator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate requirement text and build the document
    ///
    /// # Errors
    /// Returns a [`GrammarError`] for the first line that breaks the grammar:
    /// a missing or out-of-order section, a description not following the
    /// template, an entry condition without `IS`/`HAS`, an unnumbered flow
    /// step, an empty section, or any section header after the quality block.
    pub fn validate(&self, text: &str) -> UseCaseResult<RequirementDocument> {
        let mut cursor = Cursor::new(text);

        let name = Self::single_line(&mut cursor, Section::Name)?.to_string();
        let description = Self::description(&mut cursor)?;
        let actors = Self::actors(&mut cursor)?;

        let entry_conditions = cursor
            .take_block(Section::EntryConditions)?
            .into_iter()
            .map(|line| {
                if ENTRY_TOKEN.is_match(line.text) {
                    Ok(line.text.to_string())
                } else {
                    Err(GrammarError::new(
                        line.number,
                        Expected::EntryConditionToken,
                        line.text,
                    ))
                }
            })
            .collect::<UseCaseResult<Vec<_>>>()?;

        let flow_of_events = cursor
            .take_block(Section::FlowOfEvents)?
            .into_iter()
            .map(Self::flow_step)
            .collect::<UseCaseResult<Vec<_>>>()?;

        let exit_conditions = Self::free_text(cursor.take_block(Section::ExitConditions)?);
        let quality_requirements =
            Self::free_text(cursor.take_block(Section::QualityRequirements)?);

        // Quality block stops only at a header, which is never allowed here
        if cursor.peek().is_some() {
            return Err(cursor.error_here(Expected::EndOfDocument));
        }

        tracing::debug!(
            name = %name,
            actors = actors.len(),
            steps = flow_of_events.len(),
            "use case validated"
        );

        Ok(RequirementDocument::from_sections(
            name,
            description,
            actors,
            entry_conditions,
            flow_of_events,
            exit_conditions,
            quality_requirements,
        ))
    }

    fn single_line<'a>(cursor: &mut Cursor<'a>, section: Section) -> UseCaseResult<&'a str> {
        let (line, rest) = cursor.expect_header(section)?;
        if rest.is_empty() {
            return Err(GrammarError::new(
                line.number,
                Expected::Content(section),
                line.text,
            ));
        }
        Ok(rest)
    }

    fn description(cursor: &mut Cursor<'_>) -> UseCaseResult<Description> {
        let (line, rest) = cursor.expect_header(Section::Description)?;
        let caps = DESCRIPTION_TEMPLATE.captures(rest).ok_or_else(|| {
            GrammarError::new(line.number, Expected::DescriptionTemplate, line.text)
        })?;
        Ok(Description {
            text: rest.to_string(),
            actor: caps["actor"].to_string(),
            action: caps["action"].to_string(),
            value: caps["value"].to_string(),
        })
    }

    fn actors(cursor: &mut Cursor<'_>) -> UseCaseResult<Vec<String>> {
        let (line, rest) = cursor.expect_header(Section::Actors)?;
        let actors: Vec<String> = rest
            .split(',')
            .map(str::trim)
            .filter(|actor| !actor.is_empty())
            .map(str::to_string)
            .collect();
        if actors.is_empty() {
            return Err(GrammarError::new(
                line.number,
                Expected::Content(Section::Actors),
                line.text,
            ));
        }
        Ok(actors)
    }

    fn flow_step(line: Line<'_>) -> UseCaseResult<FlowStep> {
        let number = STEP_NUMBER
            .captures(line.text)
            // only overflow can fail here; the step is still numbered
            .map(|caps| caps["number"].parse::<u64>().unwrap_or(u64::MAX))
            .ok_or_else(|| GrammarError::new(line.number, Expected::NumberedStep, line.text))?;
        Ok(FlowStep {
            number,
            text: line.text.to_string(),
        })
    }

    fn free_text(lines: Vec<Line<'_>>) -> Vec<String> {
        lines.into_iter().map(|line| line.text.to_string()).collect()
    }
}
