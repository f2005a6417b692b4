use crate::models::resume::{Area, Education, Experience, PartialDate, Resume};
use crate::models::vacancy::Vacancy;
use crate::utils::html::clean_html;
use std::fmt::Write;

pub const UNSPECIFIED: &str = "Не указана";
const UNSPECIFIED_NEUTER: &str = "Не указано";

/// Renders a partial date according to its precision. A date without a year
/// is treated as unspecified no matter what else is present.
pub fn format_date(date: Option<&PartialDate>) -> String {
    let Some(date) = date else {
        return UNSPECIFIED.to_string();
    };
    let Some(year) = date.year else {
        return UNSPECIFIED.to_string();
    };
    match date.precision.as_deref().unwrap_or("day") {
        "year" => year.to_string(),
        "month" => match date.month {
            Some(month) => format!("{}-{:02}", year, month),
            None => year.to_string(),
        },
        "day" => match (date.month, date.day) {
            (Some(month), Some(day)) => format!("{}-{:02}-{:02}", year, month, day),
            _ => year.to_string(),
        },
        _ => year.to_string(),
    }
}

pub fn format_experience(experience: &[Experience]) -> String {
    let mut result = String::new();
    for exp in experience {
        let start = format_date(exp.date_from.as_ref());
        let end = format_date(exp.date_to.as_ref());
        let company = exp.company.as_deref().unwrap_or(UNSPECIFIED);
        let position = exp.position.as_deref().unwrap_or(UNSPECIFIED);
        let description = exp.description.as_deref().unwrap_or("").trim();

        let _ = write!(
            result,
            "{} — {}\nКомпания: {}\nДолжность: {}\nОписание:\n{}\n\n",
            start, end, company, position, description
        );
    }
    result
}

pub fn format_education(education: Option<&Education>) -> String {
    let mut result = String::new();
    let higher = education.map(|e| e.higher.as_slice()).unwrap_or_default();
    for edu in higher {
        let name = edu.name.as_deref().unwrap_or("");
        let faculty = edu.faculty.as_deref().unwrap_or("");
        let start = format_date(edu.date_from.as_ref());
        let end = format_date(edu.date_to.as_ref());
        let _ = writeln!(result, "{} ({}, {} - {})", name, faculty, start, end);
    }
    result
}

fn area_parts(area: &Area) -> (String, String, String) {
    let country = area
        .country
        .as_ref()
        .map(|c| c.as_str().to_string())
        .unwrap_or_default();
    let city = area
        .city
        .as_ref()
        .map(|c| c.as_str().to_string())
        .unwrap_or_default();
    let address = area.address.clone().unwrap_or_default();
    (country, city, address)
}

fn format_relocation(resume: &Resume) -> (String, String) {
    let Some(relocation) = resume.relocation.as_ref() else {
        return (UNSPECIFIED_NEUTER.to_string(), UNSPECIFIED_NEUTER.to_string());
    };

    let kind = relocation
        .kind
        .as_ref()
        .map(|k| k.as_str().to_string())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| UNSPECIFIED_NEUTER.to_string());

    let destinations: Vec<String> = relocation
        .area
        .iter()
        .filter_map(|area| {
            let (country, city, address) = area_parts(area);
            let details: Vec<String> = [city, country, address]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect();
            if details.is_empty() {
                None
            } else {
                Some(details.join(", "))
            }
        })
        .collect();

    let destinations = if destinations.is_empty() {
        UNSPECIFIED_NEUTER.to_string()
    } else {
        destinations.join("; ")
    };

    (kind, destinations)
}

/// Renders the unified resume document as plain text for the prompt.
/// Missing input yields an empty string, never an error.
pub fn format_resume(resume: Option<&Resume>) -> String {
    let Some(resume) = resume else {
        return String::new();
    };

    let position = resume.position.as_deref().unwrap_or("");

    let salary_amount = resume
        .wanted_salary
        .as_ref()
        .and_then(|s| s.amount.as_ref())
        .map(|a| a.to_string())
        .unwrap_or_default();
    let salary_currency = resume
        .wanted_salary
        .as_ref()
        .and_then(|s| s.currency.clone())
        .unwrap_or_default();

    let (country, city, address) = resume
        .area
        .as_ref()
        .map(area_parts)
        .unwrap_or_default();

    let (relocation_type, relocation_destinations) = format_relocation(resume);

    let skills = resume.skill_set.join(", ");
    let experience = format_experience(&resume.experience);
    let education = format_education(resume.education.as_ref());

    format!(
        "\nПозиция: {position}\n\
         Зарплатные ожидание: {salary_amount} + {salary_currency}\n\n\
         Местоположение: {city}, {country}, {address}\n\
         Готовность к переезду: {relocation_type}\n\
         Куда готов переехать: {relocation_destinations}\n\n\
         Навыки:\n{skills}\n\n\
         Опыт работы:\n{experience}\n\n\
         Образование:\n{education}\n"
    )
}

/// Renders the vacancy: position, salary constraint and the three HTML
/// sections after tag stripping.
pub fn format_vacancy(vacancy: &Vacancy) -> String {
    let position = vacancy.position.as_deref().unwrap_or("Не указана должность");
    let money = vacancy
        .money
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(UNSPECIFIED);

    let description = clean_html(vacancy.body.as_deref().unwrap_or(""));
    let requirements = clean_html(vacancy.requirements.as_deref().unwrap_or(""));
    let conditions = clean_html(vacancy.conditions.as_deref().unwrap_or(""));

    format!(
        "Вакансия: {position}\n\
         Ограничения по зп: {money}\n\
         Описание вакансии:\n{description}\n\n\
         Требования:\n{requirements}\n\n\
         Условия работы:\n{conditions}\n"
    )
}
