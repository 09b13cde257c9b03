//! Prompt templates for the optional LLM features.

pub const CLASSIFIER_SYSTEM: &str =
    "You are a precise classifier. Answer with exactly one word: True or False.";

pub const REWRITER_SYSTEM: &str =
    "You improve process diagram descriptions. Return only the diagram syntax.";

pub fn real_actor(name: &str) -> String {
    format!(
        "Definition of a real actor: A real actor is a person, a group, a department, \
         a system, a place location, a profession or an occupation that is involved in the process.\n\
         If yes, return only \"True\", otherwise return only \"False\".\n\
         Carefully determine if the following text describes a real actor \
         (based on the definition of a real actor):\n\
         ### Text: ###\n{name}"
    )
}

pub fn ends_process(activity: &str, description: &str) -> String {
    format!(
        "Decide whether the following activity terminates the whole process, \
         so that nothing else happens in this branch afterwards.\n\
         If yes, return only \"True\", otherwise return only \"False\".\n\
         ### Activity: ###\n{activity}\n\
         ### Full Process Description: ###\n{description}"
    )
}

pub fn improve_syntax(syntax: &str, description: &str) -> String {
    format!(
        "Tasks:\n\
         1. Improve the texts of the tasks in the following process diagram based on the given \
         text description. Tasks are denoted with []. E.g. [task1] as activity_1.\n\
         2. Keep every element id, lane and connection unchanged.\n\
         3. Return only the improved process diagram syntax as a simple string. \
         No additional text is needed.\n\n\
         Rules:\n\
         1. The first line must contain the word 'title'. Do not change the title.\n\
         2. Start events are denoted by (start). End events are denoted by (end).\n\
         3. Exclusive gateways are indicated with <>, conditions within the <>.\n\
         4. Parallel gateways are denoted by <@parallel>.\n\
         5. Connect elements using '->'; conditions look like gateway_4-\"condition\"->activity_6.\n\n\
         Diagram Syntax to be Improved:\n{syntax}\n\n\
         ### Full Process Description: ###\n{description}"
    )
}
