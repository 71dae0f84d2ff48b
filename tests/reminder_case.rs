use shimmyformula::Renderer;

const REMINDER: &str = "$[Agent $creatorName ## You] changed reminder $[«$comment»] $[:target: for $[$targetName ## you]] on $date at $time";

fn reminder_renderer() -> Renderer {
    let mut renderer = Renderer::new();
    renderer
        .assign_all([
            ("comment", "Check his payment"),
            ("date", "today"),
            ("time", "11:30 AM"),
        ])
        .unwrap();
    renderer
}

#[test]
fn test_reminder_all_features() {
    let mut renderer = reminder_renderer();
    renderer.assign("creatorName", "Mary").unwrap();
    renderer.assign("targetName", "Bob").unwrap();
    renderer.activate("target", true).unwrap();

    let rendered = renderer.execute(REMINDER, true, true);
    assert_eq!(
        rendered,
        "Agent Mary changed reminder «Check his payment» for Bob on today at 11:30 AM"
    );
}

#[test]
fn test_reminder_target_fallback_inside_active_alias() {
    let mut renderer = reminder_renderer();
    renderer.activate("target", true).unwrap();

    let rendered = renderer.execute(REMINDER, true, true);
    assert_eq!(
        rendered,
        "You changed reminder «Check his payment» for you on today at 11:30 AM"
    );
}

#[test]
fn test_reminder_alias_off_hides_target() {
    let mut renderer = reminder_renderer();
    renderer.assign("targetName", "Bob").unwrap();
    renderer.activate("target", false).unwrap();

    let rendered = renderer.execute(REMINDER, true, true);
    assert_eq!(
        rendered,
        "You changed reminder «Check his payment» on today at 11:30 AM"
    );
}

#[test]
fn test_reminder_without_comment() {
    let mut renderer = Renderer::new();
    renderer.assign("date", "today").unwrap();
    renderer.assign("time", "9:00").unwrap();

    let rendered = renderer.execute(REMINDER, true, true);
    assert_eq!(rendered, "You changed reminder on today at 9:00");
}

#[test]
fn test_reminder_bare_variables_render_empty() {
    // Top-level references have no fallback; missing ones just vanish.
    let mut renderer = Renderer::new();
    let rendered = renderer.execute(REMINDER, true, true);
    assert_eq!(rendered, "You changed reminder on at");
}

#[test]
fn test_saved_to_folder() {
    let formula = "Congrats! You saved it $[in folder '$folder'].";

    let mut renderer = Renderer::new();
    renderer.assign("folder", "Documents").unwrap();
    assert_eq!(
        renderer.execute(formula, true, true),
        "Congrats! You saved it in folder 'Documents'."
    );

    // The previous call reset the bindings.
    assert_eq!(renderer.execute(formula, true, true), "Congrats! You saved it.");
}
