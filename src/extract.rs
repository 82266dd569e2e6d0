use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

/// Id of the single final-round clue cell.
const FINAL_CLUE_ID: &str = "clue_FJ";
/// Cells with this suffix hold the revealed correct response for a clue cell
/// with the same base id. They must never be emitted as clues themselves.
const RESPONSE_SUFFIX: &str = "_r";
/// Round tag embedded in double-round clue ids (`clue_DJ_<cat>_<row>`).
const DOUBLE_ROUND_TAG: &str = "DJ";
/// Each of the two main rounds has a board of six categories.
const CATEGORIES_PER_ROUND: usize = 6;

/// Air date format used in the `#game_title` header, e.g.
/// "Wednesday, September 8, 2004".
const AIR_DATE_FORMAT: &str = "%A, %B %d, %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    Single,
    Double,
    Final,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clue {
    pub text: String,
    pub answer: String,
    pub category: String,
    pub round: Round,
    /// Dollar value; `None` for the final round.
    pub value: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub game_id: u64,
    pub air_date: NaiveDate,
    pub clues: Vec<Clue>,
}

/// Extract every clue on an episode page, in document order. Any missing or
/// malformed element fails the whole episode; there is no partial extraction.
pub fn extract_episode(html: &str, game_id: u64) -> Result<Episode> {
    let document = Html::parse_document(html);

    let air_date = extract_air_date(&document)?;
    let clues = extract_clues(&document)?;

    Ok(Episode {
        game_id,
        air_date,
        clues,
    })
}

fn extract_air_date(document: &Html) -> Result<NaiveDate> {
    let title_selector = Selector::parse("#game_title h1").unwrap();

    let title: String = document
        .select(&title_selector)
        .next()
        .context("no game title on page")?
        .text()
        .collect();

    // Title reads "Show #NNNN - Weekday, Month D, YYYY".
    let date_str = title
        .split(" - ")
        .nth(1)
        .with_context(|| format!("game title has no air date: {}", title.trim()))?;

    NaiveDate::parse_from_str(date_str.trim(), AIR_DATE_FORMAT)
        .with_context(|| format!("unparseable air date: {}", date_str.trim()))
}

/// Walk the clue cells of a parsed episode page. Categories are read in page
/// order: six single-round, six double-round, then the final-round category.
pub fn extract_clues(document: &Html) -> Result<Vec<Clue>> {
    let category_selector = Selector::parse("td.category_name").unwrap();
    let clue_selector = Selector::parse("td.clue_text").unwrap();

    let categories: Vec<String> = document
        .select(&category_selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();

    let mut clues = Vec::new();
    for cell in document.select(&clue_selector) {
        let id = cell.value().attr("id").context("clue cell has no id")?;
        if id.ends_with(RESPONSE_SUFFIX) {
            continue;
        }
        let container = cell
            .parent()
            .and_then(ElementRef::wrap)
            .with_context(|| format!("clue cell {} has no parent element", id))?;
        clues.push(format_clue(container, &categories)?);
    }
    Ok(clues)
}

/// Build one clue from its container element, which holds the clue cell and
/// the revealed-response cell as a pair.
fn format_clue(container: ElementRef, categories: &[String]) -> Result<Clue> {
    let clue_selector = Selector::parse("td.clue_text").unwrap();
    let response_selector = Selector::parse("em.correct_response").unwrap();

    let mut cells = container.select(&clue_selector);
    let clue_cell = cells.next().context("clue container has no clue cell")?;
    let answer_cell = cells.next().context("clue container has no answer cell")?;

    let id = clue_cell.value().attr("id").context("clue cell has no id")?;

    let answer = answer_cell
        .select(&response_selector)
        .next()
        .with_context(|| format!("no correct response for {}", id))?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let (category, round, value) = decode_clue_id(id, categories)?;

    Ok(Clue {
        text: clue_cell.text().collect::<String>().trim().to_string(),
        answer,
        category,
        round,
        value,
    })
}

/// Decode a clue cell id into (category, round, value).
///
/// The final clue carries no coordinates and no dollar value. Every other id
/// is `clue_<tag>_<cat>_<row>`: the row gives the value in $200 steps, the
/// double round doubles the value and offsets the category index past the
/// single-round board.
fn decode_clue_id(id: &str, categories: &[String]) -> Result<(String, Round, Option<u32>)> {
    if id == FINAL_CLUE_ID {
        let category = categories
            .last()
            .context("page has no categories")?
            .clone();
        return Ok((category, Round::Final, None));
    }

    let parts: Vec<&str> = id.split('_').collect();
    if parts.len() != 4 {
        bail!("malformed clue id: {}", id);
    }

    let round = if parts[1] == DOUBLE_ROUND_TAG {
        Round::Double
    } else {
        Round::Single
    };

    let mut category_index: usize = parts[2]
        .trim()
        .parse()
        .with_context(|| format!("bad category index in clue id: {}", id))?;
    let row: u32 = parts[3]
        .parse()
        .with_context(|| format!("bad row in clue id: {}", id))?;

    let mut value = 200 * row;
    if round == Round::Double {
        value *= 2;
        category_index += CATEGORIES_PER_ROUND;
    }

    let category = categories
        .get(category_index)
        .with_context(|| format!("category index {} out of range for {}", category_index, id))?
        .clone();

    Ok((category, round, Some(value)))
}
