//! Prompt text sent to the model.

pub fn plain(plant_type: &str) -> String {
  format!(
    "Generate simple care guidelines for a {plant_type} plant.\n\
     Return ONLY a single paragraph with basic care instructions.\n\
     \n\
     Example: \"Water chives when the soil is dry to the touch...\"\n\
     \n\
     Do not include markdown, JSON, or any formatting. \
     Return only the plain text care guidelines."
  )
}

pub fn structured(plant_type: &str) -> String {
  format!(
    "Describe a {plant_type} plant and how to care for it.\n\
     Respond with a single JSON object with exactly two string fields:\n\
     \"description\": one or two sentences about the plant,\n\
     \"care_guidelines\": one paragraph of care instructions.\n\
     Do not wrap the JSON in markdown."
  )
}
