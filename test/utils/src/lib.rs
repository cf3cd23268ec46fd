pub fn chat_response_fixture() -> &'static str {
    return r#"
{
  "response": "Here are 5 ideas for Instagram Reels aimed at busy professionals.\n\n1. 60 second desk workouts\n2. Meal prep in 10 minutes\n3. Stair sprint challenge\n4. Before and after commute routines\n5. Myth busting in 15 seconds",
  "conversation_id": "abc123",
  "timestamp": "2024-03-01T10:15:00Z",
  "suggestions": [
    "\"Write captions for idea 1\"",
    "Suggest hashtags for these reels",
    "\"Plan a posting schedule\"",
    "Turn idea 5 into a carousel"
  ],
  "response_time": 1.8
}
"#
    .trim();
}

pub fn firebase_user_fixture() -> &'static str {
    return r#"
{
  "uid": "user-1",
  "email": "coach@example.com",
  "id_token": "cached-id-token",
  "refresh_token": "refresh-1",
  "expires_at": 4102444800
}
"#
    .trim();
}
