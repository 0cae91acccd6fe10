//! Prompt builders for the assistant collaborator. The structured prompts
//! demand strict JSON so the coercer can parse replies directly; the prose
//! prompts ask for plain paragraphs surfaced to the user verbatim.

/// Asks for the top neighborhoods as a strict `topAreas` JSON envelope.
pub fn ranked_areas_prompt(business: &str, location: &str) -> String {
    format!(
        r#"You are a local market analyst. Identify the top 3 neighborhoods in {location} for opening a {business}.

Respond with ONLY a single JSON object in this exact shape, no markdown and no commentary:

{{
  "topAreas": [
    {{
      "name": string,
      "score": number,
      "saturation": "Low" | "Medium" | "High",
      "competitors": number,
      "gaps": [string, string],
      "rent": "$Xk-Yk/mo",
      "traffic": "Very High" | "High" | "Medium" | "Low",
      "latitude": number,
      "longitude": number
    }}
  ]
}}

Rules:
- "gaps" must contain exactly 2 short sentences, each an actionable opportunity inferred from negative competitor reviews or missing offerings (for example "Customers complain about slow weekend service").
- If any value is missing or ambiguous, make a single best estimate instead of asking for more information.
- Do not include any text before or after the JSON object."#
    )
}

/// Asks for a detailed breakdown of one neighborhood as a strict JSON object.
pub fn detailed_area_prompt(business: &str, location: &str, area: &str) -> String {
    format!(
        r#"Detailed market analysis for opening a {business} in the {area} neighborhood of {location}.

Respond with ONLY a single JSON object in this exact shape, no markdown and no commentary:

{{
  "name": string,
  "competitors": [{{ "name": string, "rating": number, "reviews": number, "price": string }}],
  "demographics": [{{ "type": string, "value": string }}],
  "gaps": [{{ "title": string, "description": string }}],
  "traffic": {{ "weekday": string, "weekend": string, "peak_hours": string }},
  "success_factors": [string]
}}

Mapping rules:
- Customer segments, age, income, and lifestyle notes become "demographics".
- Complaints and missing offerings become "gaps", each with a short title and a 1-2 sentence description.
- Weekday versus weekend flow and busiest times become "traffic"; "peak_hours" is the clearest peak-time description.
- Reasons existing businesses do well become "success_factors" as short phrases.
- Include the top 5 competitors with numeric ratings and review counts; use an empty price string when unknown.
- Infer a single reasonable value for anything missing rather than leaving a field out."#
    )
}

/// Asks for a plain-English service-offering insight paragraph for one area.
pub fn service_offering_prompt(business: &str, area: &str, location: &str) -> String {
    format!(
        "Summarize service offering insights for {business} in and around {area} (near {location}), \
focusing on how well services meet expectations and perceived value for money. \
Combine themes where customers want more from the experience with themes where they feel \
they did not get their money's worth, as one cohesive plain-English paragraph. \
Do not mention specific business names or locations. \
Close with 2-3 concrete service or experience improvements that would address both kinds of concerns."
    )
}

/// Asks for a review-theme summary around a specific customer question.
pub fn customer_review_prompt(query: &str, business: &str, area: &str, location: &str) -> String {
    format!(
        "Summarize what customer reviews for businesses in the {business} market in and around \
{area} (near {location}) say about {query}. Do not list individual locations."
    )
}
