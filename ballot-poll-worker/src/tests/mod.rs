// Copyright (c) 2022 MASSA LABS <info@massa.net>

mod refresh_scenarios;
mod tools;
