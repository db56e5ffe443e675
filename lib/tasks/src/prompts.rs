//! Instruction templates, one per task.
//!
//! Models are asked for bare JSON, but the replies are still run through the
//! tolerant extractor since reasoning models prepend their thinking.

use llm_inference_ai::{PromptTemplate, VariableDefinition};

const ENTITY_EXTRACTION: &str = r#"
You are an information extraction system.
Extract named entities from the following text **without translating it**.
The text may be in Arabic, English, or German.

Rules:
1. Person names must consist of at least **two words**.
2. Events must be **phrases**, not single words.
3. Return only valid JSON with this structure:
{
  "persons": ["string"],
  "locations": ["string"],
  "organizations": ["string"],
  "events": ["string"]
}
4. Do not translate the text. Do not include explanations, extra text, or markdown.
5. Keep all names and words in the original language.

Text: {{text}}
"#;

const SENTIMENT: &str = r#"
Analyze the sentiment of the following text. The text may be in Arabic, English, or German.
Return only valid JSON with this structure:
{
  "sentiment": "positive|negative|neutral",
  "confidence": 0.0-1.0
}

Text: {{text}}
"#;

const SIMILARITY: &str = r#"You are an intelligent model. Given the following two texts, compute a similarity score between 0 and 1, where 1 means identical meaning and 0 means completely different. Also, indicate if the texts should be merged based on their similarity.

Rules:
1. These two texts are from entity type: {{entity_type}}.
2. Don't compare the texts based on exact wording; focus on meaning.
3. Analyze the semantic meaning of both texts.
4. Consider context, synonyms, and phrasing.
5. Return only valid JSON with this structure:
{
  "similarity_score": float,
  "should_be_merged": boolean
}
6. Do not translate the texts.
7. Keep the response strictly to the JSON format.
8. Do not include any explanations, extra text, or markdown.
9. Round the similarity score to two decimal places.

Text 1: {{text1}}
Text 2: {{text2}}"#;

const ENHANCEMENT: &str = r#"You are an expert in named entity recognition and data quality improvement.

Your task is to enhance the quality of extracted {{entity_type}} entities by:
1. Correcting any obvious errors or typos
2. Standardizing formats and casing
3. Filtering out invalid or low-quality entries
4. Keeping only meaningful, well-formed entities
5. Keeping entities in their original language without any translation
6. Returning entities exactly as they appear in their source language

Input entities: ["{{entities}}"]

Rules:
1. Return only valid, high-quality {{entity_type}} entities
2. Remove duplicates and near-duplicates (e.g., "John Smith" and "john smith" are the same)
3. Fix obvious typos and formatting issues
4. Remove entries that are clearly not valid {{entity_type}} entities
5. Standardize capitalization appropriately for {{entity_type}} entities
6. When removing duplicates, return only one instance of each entity
7. Consider Arabic letters, ي or ى may be the same letter
8. Never translate entities - keep them in their original language
9. Return results in JSON format only

Required JSON structure:
{
  "enhanced_entities": ["entity1", "entity2", "entity3"]
}

Do not include any explanations, markdown, or extra text - only the JSON response."#;

const VERIFICATION: &str = r#"You are an expert in named entity recognition and data quality improvement.

Your task is to verify the quality of an extracted {{entity_type}} entity by:
1. Determining if the entity is valid and meaningful
2. Never translating entities - keep them in their original language
3. Considering Arabic letters, ي or ى may be the same letter
4. Returning results in JSON format only

Input entity: "{{entity}}"

Rules:
1. Determine if the entity is valid and meaningful
2. Never translate entities - keep them in their original language
3. Consider Arabic letters, ي or ى may be the same letter
4. Consider all forms of the entity, including singular/plural and different grammatical cases
5. Return verified as true if the entity is valid, otherwise false
6. The entity is not valid if it is too generic, vague, or does not provide useful information
7. The entity is not a valid location if it is a non-specific place like "city", "country", or "region"
8. The entity is not a valid person name if it is a common noun or title like "doctor", "engineer", or "teacher"
9. The entity is not a valid organization if it is a generic term like "company", "institution", or "agency"
10. The entity is not a valid location if it combines two or more different locations, like "الولايات المتحدة وكندا"
11. Return results in JSON format only

Required JSON structure:
{
  "entity": entity_name,
  "verified": true/false
}
"#;

/// Named-entity extraction over `{{text}}`.
#[must_use]
pub fn entity_extraction() -> PromptTemplate {
    PromptTemplate::new("entity_extraction", ENTITY_EXTRACTION)
        .with_variable("text", VariableDefinition::required("Text to extract entities from"))
}

/// Sentiment classification of `{{text}}`.
#[must_use]
pub fn sentiment() -> PromptTemplate {
    PromptTemplate::new("sentiment", SENTIMENT)
        .with_variable("text", VariableDefinition::required("Text to classify"))
}

/// Semantic similarity of `{{text1}}` and `{{text2}}`.
#[must_use]
pub fn similarity() -> PromptTemplate {
    PromptTemplate::new("similarity", SIMILARITY)
        .with_variable("text1", VariableDefinition::required("First text"))
        .with_variable("text2", VariableDefinition::required("Second text"))
        .with_variable(
            "entity_type",
            VariableDefinition::required("Entity type both texts belong to"),
        )
}

/// Clean-up of an entity list. `{{entities}}` is pre-joined with `", "`.
#[must_use]
pub fn enhancement() -> PromptTemplate {
    PromptTemplate::new("entity_enhancement", ENHANCEMENT)
        .with_variable("entities", VariableDefinition::required("Quoted, joined entity list"))
        .with_variable("entity_type", VariableDefinition::required("Entity type"))
}

/// Validity check of a single `{{entity}}`.
#[must_use]
pub fn verification() -> PromptTemplate {
    PromptTemplate::new("entity_verification", VERIFICATION)
        .with_variable("entity", VariableDefinition::required("Entity to verify"))
        .with_variable("entity_type", VariableDefinition::required("Entity type"))
}
