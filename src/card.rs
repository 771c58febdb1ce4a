//! Builds the Discord embed shown for a lookup.

use log::warn;
use poise::serenity_prelude::{Colour, CreateEmbed, CreateEmbedFooter};
use strum::IntoEnumIterator;

use crate::ipinfo::{InfoField, LookupResult};

pub const FOOTER: &str = "Data provided by ipinfo.io";

/// Raw JSON is only attached when shorter than this (Discord field value limit).
pub const RAW_JSON_LIMIT: usize = 1024;

/// Discord rejects embeds whose combined text exceeds this.
pub const CARD_LENGTH_LIMIT: usize = 6000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl CardField {
    fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Map links for a parsed `loc` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLinks {
    pub openstreetmap: String,
    pub google_maps: String,
}

impl MapLinks {
    /// Parse `"lat,lon"`. Returns `None` unless both halves are numbers.
    #[must_use]
    pub fn from_loc(loc: &str) -> Option<Self> {
        let (lat, lon) = loc.split_once(',')?;
        let (lat, lon) = (lat.trim(), lon.trim());
        let is_coordinate = |s: &str| s.parse::<f64>().is_ok_and(f64::is_finite);
        if !is_coordinate(lat) || !is_coordinate(lon) {
            return None;
        }

        Some(Self {
            openstreetmap: format!(
                "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=8/{lat}/{lon}"
            ),
            google_maps: format!("https://www.google.com/maps?q={lat},{lon}"),
        })
    }

    fn markdown(&self) -> String {
        format!(
            "[OpenStreetMap]({}) | [Google Maps]({})",
            self.openstreetmap, self.google_maps
        )
    }
}

/// Rendered lookup, ready to be turned into an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCard {
    pub title: String,
    pub fields: Vec<CardField>,
    pub map: Option<MapLinks>,
    pub raw_json: Option<String>,
    pub footer: String,
}

impl DisplayCard {
    /// Embed length as Discord counts it: title, field names and values, footer.
    #[must_use]
    pub fn len(&self) -> usize {
        let count = |s: &str| s.chars().count();
        count(&self.title)
            + count(&self.footer)
            + self
                .all_fields()
                .iter()
                .map(|f| count(&f.name) + count(&f.value))
                .sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Data fields followed by the map and raw JSON blocks.
    #[must_use]
    pub fn all_fields(&self) -> Vec<CardField> {
        let mut fields = self.fields.clone();
        if let Some(map) = &self.map {
            fields.push(CardField::new("Map", map.markdown(), false));
        }
        if let Some(raw) = &self.raw_json {
            fields.push(CardField::new("Raw JSON", format!("```json\n{raw}\n```"), false));
        }
        fields
    }

    #[must_use]
    pub fn to_embed(&self) -> CreateEmbed {
        self.all_fields().into_iter().fold(
            CreateEmbed::new()
                .title(&self.title)
                .colour(Colour::BLURPLE)
                .footer(CreateEmbedFooter::new(&self.footer)),
            |embed, field| embed.field(field.name, field.value, field.inline),
        )
    }
}

/// Render a lookup result into a card.
#[must_use]
pub fn render(target: &str, result: &LookupResult) -> DisplayCard {
    render_with(target, result, true)
}

/// Render, then shrink once if the card is over Discord's size ceiling.
///
/// The reduced card drops the raw JSON block and any `raw` key from the payload.
#[must_use]
pub fn build_card(target: &str, result: &LookupResult) -> DisplayCard {
    let card = render(target, result);
    if card.len() <= CARD_LENGTH_LIMIT {
        return card;
    }

    warn!(
        "Card for '{target}' is {} characters, re-rendering without raw payload",
        card.len()
    );
    render_with(target, &result.without("raw"), false)
}

fn render_with(target: &str, result: &LookupResult, include_raw: bool) -> DisplayCard {
    let fields = InfoField::iter()
        .filter_map(|field| {
            result
                .field(field)
                .map(|value| CardField::new(field.to_string(), value, true))
        })
        .collect();

    let map = result
        .field(InfoField::Location)
        .and_then(|loc| MapLinks::from_loc(&loc));

    let raw_json = include_raw
        .then(|| serde_json::to_string_pretty(result.payload()).ok())
        .flatten()
        .filter(|pretty| pretty.chars().count() < RAW_JSON_LIMIT);

    DisplayCard {
        title: format!("IP info — {target}"),
        fields,
        map,
        raw_json,
        footer: FOOTER.to_string(),
    }
}
