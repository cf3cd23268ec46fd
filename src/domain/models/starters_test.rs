use super::starter_prompt;

#[test]
fn it_numbers_prompts_across_categories() {
    assert_eq!(
        starter_prompt(1),
        Some("Generate 5 viral Instagram Reel ideas for a fitness coach targeting busy professionals")
    );
    assert_eq!(
        starter_prompt(5),
        Some("Find the best hashtags for my sustainable fashion brand on Instagram")
    );
    assert_eq!(
        starter_prompt(19),
        Some("How can I build an engaged community around my brand on social media?")
    );
}

#[test]
fn it_rejects_out_of_range_numbers() {
    assert_eq!(starter_prompt(0), None);
    assert_eq!(starter_prompt(20), None);
}
