/// Prompt templates for component generation
use super::GenerationRequest;

/// Build the single user message sent for one component
pub fn component_prompt(request: &GenerationRequest) -> String {
    let dialect = request.dialect;
    let framework = dialect.framework;

    let typing = if dialect.is_typescript() {
        "Include proper TypeScript types"
    } else {
        "Use JSDoc for type documentation"
    };

    let structure = if dialect.is_vue() {
        "\n6. Include both template and script sections"
    } else {
        ""
    };

    format!(
        r#"You are helping create a {framework} component named {name}. Here is the context where it's being used:

{context}

Please create a {language} {framework} component that would work well in this context. The component should:
1. Be exported as default
2. {typing}
3. Be fully functional based on how it appears to be used in the source file, aligning with any comments in the usage file
4. Be completely self contained apart from third party imports: no .css imports and no imports of helper functions or components
5. Have only one default export, the component{structure}

Return only the component code with no explanation or markdown."#,
        framework = framework,
        name = request.component_name,
        context = request.context,
        language = dialect.language,
        typing = typing,
        structure = structure,
    )
}
