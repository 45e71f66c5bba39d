//! Prompt templates. Inputs are interpolated verbatim.

use crate::diagram::DiagramKind;
use crate::document::DocumentKind;
use crate::model::RequirementType;

pub fn expand_requirement(basic_requirement: &str, requirement_type: RequirementType) -> String {
    format!(
        "Expand the following basic {requirement_type} requirement into a detailed requirement.
Include specific details about:
- Functional aspects
- Technical considerations
- User interactions
- Performance criteria
- Security considerations (if applicable)
- Integration points (if applicable)

Basic Requirement: {basic_requirement}

Provide a comprehensive, well-structured detailed requirement."
    )
}

pub fn break_down_requirement(
    detailed_requirement: &str,
    requirement_type: RequirementType,
) -> String {
    format!(
        "Break down the following detailed {requirement_type} requirement into individual tasks.
Each task should be specific, actionable, and independent.
Format the response as a JSON array of task descriptions.

Detailed Requirement: {detailed_requirement}

Response format:
[\"task1 description\", \"task2 description\", ...]"
    )
}

pub fn convert_to_work_item(task: &str, requirement_type: RequirementType) -> String {
    format!(
        "Convert the following {requirement_type} requirement into a JIRA story.
Include the following fields:
- Summary
- Description
- AcceptanceCriteria
- StoryPoints (using Fibonacci sequence: 1,2,3,5,8,13)
- Priority (High/Medium/Low)
- Labels

Requirement: {task}

Format the response as a JSON object with the above fields as keys.
The response should be a valid JSON object like this:
{{
    \"Summary\": \"...\",
    \"Description\": \"...\",
    \"AcceptanceCriteria\": \"...\",
    \"StoryPoints\": 3,
    \"Priority\": \"High\",
    \"Labels\": [\"label1\", \"label2\"]
}}"
    )
}

const MERMAID_INSTRUCTIONS: &str = "Create a Mermaid diagram following these exact rules:
1. Start with the correct diagram declaration (stateDiagram-v2, classDiagram, sequenceDiagram, or erDiagram)
2. Use proper syntax specific to the diagram type
3. Avoid any special characters or formatting that could break the Mermaid syntax
4. Include all necessary elements and relationships
5. Return only the Mermaid code without any additional text or markdown
6. For class diagrams: Use proper class member syntax with {} brackets or : notation
7. For class diagrams: Avoid special characters in class names, use simple alphanumeric names
8. For class diagrams: Use proper relationship syntax (--|>, -->, --*, --o, ..|>, ..>, ..*)
9. Ensure all class names are simple without spaces or special characters
10. Use proper indentation and line endings";

pub fn diagram(requirements: &str, kind: DiagramKind) -> String {
    let specific = match kind {
        DiagramKind::State => format!(
            "Create a state diagram with these requirements:
{requirements}

Use these syntax rules:
- Start with 'stateDiagram-v2'
- Define states using simple names without spaces
- Use proper arrow syntax (-->)
- Add [*] for start/end states if needed
- Use notes with 'note' keyword
- End each relationship with a colon and description"
        ),
        DiagramKind::Class => format!(
            "Create a class diagram with these requirements:
{requirements}

CRITICAL: Follow these exact syntax rules for class diagrams:
- Start with 'classDiagram'
- Use simple class names without spaces (e.g., User, Product, OrderItem)
- Define class members using curly braces syntax:
  class ClassName {{
    +attribute1 type
    +attribute2 type
    +method1() returnType
    +method2() returnType
  }}
- Use proper relationship arrows: --> (association), --* (composition), --o (aggregation), --|> (inheritance)
- Example relationship: User --> Order : creates
- Use + for public, - for private, # for protected
- Avoid special characters, parentheses in class names
- Each class definition should be on separate lines
- No semicolons needed for class diagrams"
        ),
        DiagramKind::Sequence => format!(
            "Create a sequence diagram with these requirements:
{requirements}

Use these syntax rules:
- Start with 'sequenceDiagram'
- Define participants using 'participant' keyword
- Use proper arrow types (->, -->>, --x)
- Group related actions with 'opt' or 'alt'
- Use 'Note' for additional information"
        ),
        DiagramKind::Er => format!(
            "Create an ER diagram with these requirements:
{requirements}

Use these syntax rules:
- Start with 'erDiagram'
- Define entities and relationships
- Use proper relationship symbols (||--o{{, }}|--|{{)
- Add relationship labels with proper syntax
- Include attributes with proper types"
        ),
    };

    format!("{MERMAID_INSTRUCTIONS}\n\nCreate the following diagram:\n{specific}")
}

pub fn document(kind: DocumentKind, user_input: &str) -> String {
    let (opening, sections) = match kind {
        DocumentKind::BusinessRequirements => (
            "Please analyze the following business requirement and generate a detailed response covering:",
            [
                "Strategic alignment and business outcomes",
                "Operational impact and changes",
                "Stakeholder analysis",
                "Risk assessment and mitigation",
                "Timeline and resource requirements",
            ],
        ),
        DocumentKind::UserRequirements => (
            "Please analyze the following user requirement and provide a detailed breakdown including:",
            [
                "User persona analysis",
                "User stories in 'As a [user], I want to [action], so that [benefit]' format",
                "Pain points and goals",
                "Usage scenarios and environments",
                "Success criteria from user perspective",
            ],
        ),
        DocumentKind::ProductRequirements => (
            "Please analyze the following product requirement and provide detailed specifications covering:",
            [
                "Core functional requirements",
                "Non-functional requirements",
                "Performance criteria",
                "Integration requirements",
                "Technical constraints",
            ],
        ),
        DocumentKind::TechnicalRequirements => (
            "Please analyze the following technical requirement and provide detailed specifications including:",
            [
                "System architecture requirements",
                "Development and implementation details",
                "Integration specifications",
                "Security requirements",
                "Performance benchmarks",
            ],
        ),
        DocumentKind::QualityCompliance => (
            "Please analyze the following quality/compliance requirement and provide detailed specifications covering:",
            [
                "Quality standards and metrics",
                "Compliance requirements",
                "Testing protocols",
                "Audit requirements",
                "Documentation needs",
            ],
        ),
    };

    let bullets: String = sections.iter().map(|s| format!("- {s}\n")).collect();
    format!("{opening}\n{bullets}\nUser Input: {user_input}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_interpolates_type_and_input() {
        let p = expand_requirement("Users can reset passwords", RequirementType::Technical);
        assert!(p.contains("basic Technical requirement"));
        assert!(p.contains("Basic Requirement: Users can reset passwords"));
    }

    #[test]
    fn test_work_item_prompt_shows_literal_json_example() {
        let p = convert_to_work_item("Add audit log", RequirementType::Quality);
        assert!(p.contains("{\n    \"Summary\": \"...\""));
        assert!(p.contains("Requirement: Add audit log"));
    }

    #[test]
    fn test_diagram_prompt_has_instructions_and_kind_rules() {
        let p = diagram("Order lifecycle", DiagramKind::State);
        assert!(p.starts_with("Create a Mermaid diagram"));
        assert!(p.contains("Start with 'stateDiagram-v2'"));
        assert!(p.contains("Order lifecycle"));

        let er = diagram("Shop", DiagramKind::Er);
        assert!(er.contains("(||--o{, }|--|{)"));
    }

    #[test]
    fn test_document_prompt_sections() {
        let p = document(DocumentKind::UserRequirements, "Mobile checkout");
        assert!(p.contains("- User persona analysis\n"));
        assert!(p.ends_with("User Input: Mobile checkout\n"));
    }
}
