// Rendering of flight offers into the result list shown under the search form

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

use crate::offers::{FlightOffer, Segment};

pub const OUTBOUND_LABEL: &str = "Outbound";
pub const RETURN_LABEL: &str = "Return";
pub const PATH_SEPARATOR: &str = " → ";
pub const NO_RESULTS_TEXT: &str = "No results";

lazy_static! {
    // `<hours>H<minutes>` anywhere in the token, minutes optional ("PT2H30M", "5H")
    static ref DURATION_PATTERN: Regex =
        Regex::new(r"(\d+)H(\d+)?").expect("duration pattern is valid");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid itinerary duration: {0:?}")]
    InvalidDuration(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Parses the hours and minutes out of an itinerary duration.
///
/// Accepts the first match of `\d+H(\d+)?` in the token; missing minutes are
/// read as zero. A token without an hours component is an error.
pub fn parse_duration(token: &str) -> Result<FlightDuration, RenderError> {
    let invalid = || RenderError::InvalidDuration(token.to_string());

    let captures = DURATION_PATTERN.captures(token).ok_or_else(invalid)?;
    let hours = captures[1].parse().map_err(|_| invalid())?;
    let minutes = match captures.get(2) {
        Some(minutes) => minutes.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };

    Ok(FlightDuration { hours, minutes })
}

/// Departure code of every segment followed by the arrival code of the last.
pub fn travel_path(segments: &[Segment]) -> String {
    let mut codes: Vec<&str> = segments
        .iter()
        .map(|segment| segment.departure.iata_code.as_str())
        .collect();
    if let Some(last) = segments.last() {
        codes.push(last.arrival.iata_code.as_str());
    }
    codes.join(PATH_SEPARATOR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLeg {
    pub label: &'static str,
    pub path: String,
    pub duration: FlightDuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOffer {
    pub legs: Vec<RenderedLeg>,
    pub price_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultItem {
    NoResults,
    Offer(RenderedOffer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResults {
    pub items: Vec<ResultItem>,
}

impl RenderedResults {
    pub fn is_no_results(&self) -> bool {
        matches!(self.items.as_slice(), [ResultItem::NoResults])
    }

    pub fn offers(&self) -> impl Iterator<Item = &RenderedOffer> {
        self.items.iter().filter_map(|item| match item {
            ResultItem::Offer(offer) => Some(offer),
            ResultItem::NoResults => None,
        })
    }

    /// List-item markup for the results `<ul>`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for item in &self.items {
            match item {
                ResultItem::NoResults => {
                    html.push_str(
                        r#"<li class="list-group-item d-flex justify-content-center align-items-center" id="search-no-results">"#,
                    );
                    html.push_str(NO_RESULTS_TEXT);
                    html.push_str("</li>\n");
                }
                ResultItem::Offer(offer) => {
                    html.push_str(
                        r#"<li class="flex-column flex-sm-row list-group-item d-flex justify-content-between align-items-sm-center">"#,
                    );
                    for leg in &offer.legs {
                        html.push_str(&format!(
                            r#"<div class="flex-column flex-1 m-2 d-flex"><small class="text-muted">{}</small><span class="fw-bold">{}</span><div>{}</div></div>"#,
                            leg.label,
                            escape_html(&leg.path),
                            leg.duration
                        ));
                    }
                    html.push_str(&format!(
                        r#"<span class="bg-primary rounded-pill m-2 badge fs-6">{}</span>"#,
                        escape_html(&offer.price_label)
                    ));
                    html.push_str("</li>\n");
                }
            }
        }
        html
    }
}

/// Maps offers to result items, keeping the provider's order.
pub fn render(offers: &[FlightOffer]) -> Result<RenderedResults, RenderError> {
    if offers.is_empty() {
        return Ok(RenderedResults {
            items: vec![ResultItem::NoResults],
        });
    }

    let items = offers
        .iter()
        .map(|offer| render_offer(offer).map(ResultItem::Offer))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderedResults { items })
}

fn render_offer(offer: &FlightOffer) -> Result<RenderedOffer, RenderError> {
    let legs = offer
        .itineraries
        .iter()
        .enumerate()
        .map(|(index, itinerary)| -> Result<RenderedLeg, RenderError> {
            Ok(RenderedLeg {
                label: if index == 0 { OUTBOUND_LABEL } else { RETURN_LABEL },
                path: travel_path(&itinerary.segments),
                duration: parse_duration(&itinerary.duration)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderedOffer {
        legs,
        price_label: format!("{} {}", offer.price.total, offer.price.currency),
    })
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
