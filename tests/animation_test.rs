use approx::assert_relative_eq;
use futures::FutureExt;
use kinetic::prelude::*;
use kinetic::{AnimationError, TweenState};
use std::cell::Cell;
use std::rc::Rc;

#[derive(StyleContext)]
struct Card {
    #[root]
    root: Rc<InlineStyle>,
    #[target]
    icon: Rc<InlineStyle>,
    #[target(name = "label")]
    caption: Rc<InlineStyle>,
    #[clock]
    clock: FrameClock,
    #[animations]
    animations: AnimationSet,
}

#[derive(StyleContext)]
#[style_context(component = "Card")]
struct FancyCard {
    #[root]
    root: Rc<InlineStyle>,
    #[clock]
    clock: FrameClock,
    #[animations]
    animations: AnimationSet,
}

fn card_table() -> AnimationTable {
    AnimationTable::from([
        (
            "fadeToRed".to_string(),
            AnimationGroup::new([PrimitiveAnimation::new("color", "red").duration(200.0)]),
        ),
        (
            "reveal".to_string(),
            AnimationGroup::new([
                PrimitiveAnimation::new("display", "block")
                    .from("none")
                    .delay(100.0)
                    .duration(100.0),
                PrimitiveAnimation::new("opacity", 1)
                    .target("icon")
                    .delay(100.0)
                    .duration(100.0),
            ]),
        ),
        (
            "grow".to_string(),
            AnimationGroup::new([
                PrimitiveAnimation::new("width", "100px").duration(100.0),
                PrimitiveAnimation::new("height", "300px").duration(300.0),
            ]),
        ),
        (
            "slide".to_string(),
            AnimationGroup::new([PrimitiveAnimation::new("left", "100px")
                .from("0px")
                .duration(100.0)]),
        ),
    ])
}

fn registry() -> Rc<AnimationRegistry> {
    let registry = AnimationRegistry::new();
    registry.register("Card", card_table());
    registry
}

fn card(registry: &Rc<AnimationRegistry>) -> Card {
    Card {
        root: InlineStyle::with([
            ("color", "#000"),
            ("display", "none"),
            ("width", "0px"),
            ("height", "0px"),
        ]),
        icon: InlineStyle::with([("opacity", "0")]),
        caption: InlineStyle::new(),
        clock: FrameClock::new(),
        animations: AnimationSet::new(registry.clone()),
    }
}

fn get(style: &InlineStyle, track: &str) -> String {
    style.get_style(track).unwrap_or_default()
}

mod generated {
    use super::*;

    #[test]
    fn generates_component_name_and_targets() {
        let card = card(&registry());

        assert_eq!(card.component_name(), "Card");
        card.root_style().set_style("width", "1px");
        card.target_style("icon").unwrap().set_style("width", "2px");
        card.target_style("label").unwrap().set_style("width", "3px");

        assert_eq!(get(&card.root, "width"), "1px");
        assert_eq!(get(&card.icon, "width"), "2px");
        assert_eq!(get(&card.caption, "width"), "3px");
        assert!(card.target_style("caption").is_none());
        assert!(card.target_style("badge").is_none());
    }

    #[test]
    fn uses_declared_clock() {
        let card = card(&registry());

        assert!(card.clock().ptr_eq(&card.clock));
        assert!(!card.clock().ptr_eq(&FrameClock::current()));
    }

    #[test]
    fn component_name_can_be_overridden() {
        let registry = registry();
        let fancy = FancyCard {
            root: InlineStyle::with([("width", "0px"), ("height", "0px")]),
            clock: FrameClock::new(),
            animations: AnimationSet::new(registry),
        };

        assert_eq!(fancy.component_name(), "Card");
        fancy.animations("grow").unwrap().start();
        fancy.clock.advance(300.0);

        assert_eq!(get(&fancy.root, "height"), "300px");
    }
}

mod registry {
    use super::*;

    #[test]
    fn same_name_returns_same_animation() {
        let card = card(&registry());

        let first = card.animations("grow").unwrap();
        let second = card.animations("grow").unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert!(card.animations.is_cached("grow"));
    }

    #[test]
    fn instances_resolve_their_own_animations() {
        let registry = registry();
        let first = card(&registry);
        let second = card(&registry);

        first.animations("grow").unwrap().start();
        first.clock.advance(300.0);

        assert_eq!(get(&first.root, "width"), "100px");
        assert_eq!(get(&second.root, "width"), "0px");
        assert!(!second.animations.is_cached("grow"));
    }

    #[test]
    fn missing_name_fails_without_touching_styles() {
        let card = card(&registry());

        let result = card.animations("explode");

        assert!(matches!(
            result,
            Err(AnimationError::UnknownAnimation { ref component, ref name })
                if component == "Card" && name == "explode"
        ));
        assert_eq!(get(&card.root, "color"), "#000");
        assert!(card.clock.is_idle());
    }

    #[test]
    fn replaced_table_applies_after_cache_is_cleared() {
        let registry = registry();
        let card = card(&registry);
        registry.set(
            "Card",
            AnimationTable::from([(
                "grow".to_string(),
                AnimationGroup::new([PrimitiveAnimation::new("width", "50px").duration(100.0)]),
            )]),
        );

        card.animations("grow").unwrap().start();
        card.clock.advance(100.0);
        assert_eq!(get(&card.root, "width"), "50px");

        assert!(registry.reset("Card"));
        card.animations.clear();
        card.animations("grow").unwrap().start();
        card.clock.advance(300.0);
        assert_eq!(get(&card.root, "width"), "100px");
    }

    #[test]
    fn loads_definitions_from_json() {
        let registry = AnimationRegistry::new();
        registry
            .load_json(
                "Card",
                r#"{
                    "pulse": {
                        "duration": 100,
                        "animations": [
                            { "track": "opacity", "to": 1, "from": 0, "target": "icon" },
                            { "track": "width", "to": "40px", "ease": "linear" }
                        ]
                    }
                }"#,
            )
            .unwrap();
        let card = card(&registry);

        card.animations("pulse").unwrap().start();
        card.clock.advance(50.0);
        assert_eq!(get(&card.icon, "opacity"), "0.5");
        assert_eq!(get(&card.root, "width"), "20px");

        card.clock.advance(50.0);
        assert_eq!(get(&card.icon, "opacity"), "1");
        assert_eq!(get(&card.root, "width"), "40px");
    }

    #[test]
    fn malformed_json_keeps_current_table() {
        let registry = registry();

        let result = registry.load_json("Card", r#"{ "grow": { "animations": 3 } }"#);

        assert!(matches!(result, Err(AnimationError::Definition(_))));
        assert!(registry.table("Card").unwrap().contains_key("fadeToRed"));
    }
}

mod playback {
    use super::*;

    #[test]
    fn fades_to_red_from_live_color() {
        let card = card(&registry());
        let animation = card.animations("fadeToRed").unwrap();

        animation.start();
        assert_eq!(get(&card.root, "color"), "#000");

        card.clock.advance(100.0);
        let midway = get(&card.root, "color");
        assert!(midway.starts_with("rgba("), "unexpected midway color {midway}");

        card.clock.advance(100.0);
        assert_eq!(get(&card.root, "color"), "red");
        assert_eq!(animation.tweens()[0].state(), TweenState::Completed);
        assert!(card.clock.is_idle());
    }

    #[test]
    fn auto_from_samples_current_value_on_every_start() {
        let card = card(&registry());
        let animation = card.animations("fadeToRed").unwrap();
        animation.start();
        card.clock.advance(200.0);
        assert_eq!(get(&card.root, "color"), "red");

        card.root.set_style("color", "blue");
        animation.start();

        assert_eq!(get(&card.root, "color"), "blue");
        card.clock.advance(200.0);
        assert_eq!(get(&card.root, "color"), "red");
    }

    #[test]
    fn discrete_track_switches_once_delay_ends() {
        let card = card(&registry());
        let animation = card.animations("reveal").unwrap();

        animation.start();
        assert_eq!(get(&card.root, "display"), "none");
        card.clock.advance(99.0);
        assert_eq!(get(&card.root, "display"), "none");
        assert_eq!(get(&card.icon, "opacity"), "0");

        card.clock.advance(1.0);
        assert_eq!(get(&card.root, "display"), "block");
        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "display"), "block");
        assert_eq!(get(&card.icon, "opacity"), "0.5");

        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "display"), "block");
        assert_eq!(get(&card.icon, "opacity"), "1");
    }

    #[test]
    fn group_tracks_finish_together() {
        let card = card(&registry());
        let animation = card.animations("grow").unwrap();
        let completed = Rc::new(Cell::new(false));
        let flag = completed.clone();

        animation.start_with(move || flag.set(true));
        card.clock.advance(100.0);
        assert_eq!(get(&card.root, "width"), "100px");
        assert_eq!(get(&card.root, "height"), "100px");
        assert!(!completed.get());

        card.clock.advance(200.0);
        assert_eq!(get(&card.root, "width"), "100px");
        assert_eq!(get(&card.root, "height"), "300px");
        assert!(completed.get());
    }

    #[test]
    fn restart_while_running_replays_from_beginning() {
        let card = card(&registry());
        let animation = card.animations("slide").unwrap();

        animation.start();
        card.clock.advance(80.0);
        assert_eq!(get(&card.root, "left"), "80px");

        animation.start();
        assert_eq!(get(&card.root, "left"), "0px");
        assert_eq!(animation.elapsed(), 0.0);
        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "left"), "50px");
    }

    #[test]
    fn to_end_is_idempotent_and_start_replays() {
        let card = card(&registry());
        let animation = card.animations("slide").unwrap();

        animation.to_end();
        animation.to_end();
        assert_eq!(get(&card.root, "left"), "100px");

        animation.start();
        assert_eq!(get(&card.root, "left"), "0px");
        card.clock.advance(100.0);
        assert_eq!(get(&card.root, "left"), "100px");
    }

    #[test]
    fn to_beginning_ignores_auto_from_tracks() {
        let card = card(&registry());
        let slide = card.animations("slide").unwrap();
        let fade = card.animations("fadeToRed").unwrap();
        card.root.set_style("left", "40px");

        slide.to_beginning();
        fade.to_beginning();

        assert_eq!(get(&card.root, "left"), "0px");
        assert_eq!(get(&card.root, "color"), "#000");
    }

    #[test]
    fn stop_pauses_until_next_start() {
        let card = card(&registry());
        let animation = card.animations("slide").unwrap();

        animation.start();
        card.clock.advance(30.0);
        animation.stop();
        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "left"), "30px");
        assert!(card.clock.is_idle());
        assert_relative_eq!(animation.progress(), 0.3, epsilon = 1e-5);
    }

    #[test]
    fn chained_restart_from_completion_replays() {
        let card = card(&registry());
        let animation = card.animations("slide").unwrap();
        let chained = animation.clone();
        let laps = Rc::new(Cell::new(0));
        let counter = laps.clone();

        animation.start_with(move || {
            counter.set(counter.get() + 1);
            chained.start();
        });
        card.clock.advance(100.0);
        assert_eq!(laps.get(), 1);
        assert_eq!(get(&card.root, "left"), "0px");

        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "left"), "50px");
        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "left"), "100px");
        assert_eq!(laps.get(), 1);
        assert!(card.clock.is_idle());
    }

    #[test]
    fn async_completion_resolves_and_restart_cancels() {
        let card = card(&registry());
        let animation = card.animations("grow").unwrap();

        let cancelled = animation.start_async();
        let mut completion = animation.start_async();
        assert!(matches!(cancelled.now_or_never(), Some(Err(AnimationError::Cancelled))));

        card.clock.advance(150.0);
        assert!((&mut completion).now_or_never().is_none());
        card.clock.advance(150.0);
        assert!(matches!(completion.now_or_never(), Some(Ok(()))));
    }
}

mod helpers {
    use super::*;

    #[test]
    fn animate_runs_a_single_track() {
        let card = card(&registry());

        let tween = animate(&card, PrimitiveAnimation::new("opacity", 1).target("icon").duration(100.0))
            .unwrap();
        card.clock.advance(50.0);
        assert_eq!(get(&card.icon, "opacity"), "0.5");

        card.clock.advance(50.0);
        assert_eq!(get(&card.icon, "opacity"), "1");
        assert_eq!(tween.state(), TweenState::Completed);
    }

    #[test]
    fn zero_length_discrete_track_switches_immediately() {
        let card = card(&registry());

        let tween = animate(&card, PrimitiveAnimation::new("display", "block").duration(0.0)).unwrap();

        assert_eq!(get(&card.root, "display"), "block");
        assert_eq!(tween.state(), TweenState::Completed);
        assert!(card.clock.is_idle());
    }

    #[test]
    fn fades_root_in_and_out() {
        let card = card(&registry());
        card.root.set_style("opacity", "0");

        fade_in(&card, FadeOptions::default()).unwrap();
        card.clock.advance(250.0);
        assert_eq!(get(&card.root, "opacity"), "1.0");

        fade_out(&card, FadeOptions::default().duration(100.0)).unwrap();
        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "opacity"), "0.5");
        card.clock.advance(50.0);
        assert_eq!(get(&card.root, "opacity"), "0");
    }
}
