mod replay_window_tests;
